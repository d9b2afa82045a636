//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::ConnectorConfig;
use crate::engine::{parse_items, BatchConfig, BatchRunner, Operation};
use crate::error::{Error, Result, ResultExt};
use crate::resources::{GetManyParams, Resource, ShipmentParams};
use crate::types::{JsonValue, ValueMap};
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Resources => {
                self.resources();
                Ok(())
            }
            Commands::Get {
                resource,
                fields,
                filters,
                all,
                page_size,
                page_delay_ms,
                offset,
                limit,
                no_safe_mode,
            } => {
                let params = GetManyParams {
                    resource: *resource,
                    fields: fields.clone(),
                    filters: filters
                        .iter()
                        .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
                        .collect::<ValueMap>(),
                    fetch_all_pages: *all,
                    page_size: *page_size,
                    page_delay_ms: *page_delay_ms,
                    offset: *offset,
                    limit: *limit,
                    safe_mode: Some(!*no_safe_mode),
                };
                self.execute(Operation::GetMany(params)).await
            }
            Commands::SetShipment {
                order_id,
                shipment_id,
                tracking_number,
                shipment_info,
            } => {
                let params = ShipmentParams {
                    order_id: json!(order_id),
                    shipment_id: json!(shipment_id),
                    tracking_number: tracking_number.clone(),
                    shipment_info: json!(shipment_info),
                };
                self.execute(Operation::SetShipment(params)).await
            }
            Commands::Run {
                items,
                continue_on_fail,
            } => self.run_items(items, *continue_on_fail).await,
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<ConnectorConfig> {
        // Inline config takes precedence
        if let Some(ref json_str) = self.cli.config_json {
            return ConnectorConfig::from_json_str(json_str).context("Invalid config JSON");
        }

        if let Some(ref path) = self.cli.config {
            return ConnectorConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()));
        }

        Err(Error::config(
            "Config not specified (use -C <file> or --config-json)",
        ))
    }

    /// Connect with the loaded configuration
    async fn connect(&self) -> Result<BatchRunner> {
        let config = self.load_config()?;
        BatchRunner::connect(&config).await
    }

    /// Check credentials
    async fn check(&self) -> Result<()> {
        let runner = self.connect().await?;
        self.output(&json!({
            "status": "SUCCEEDED",
            "endpoint": runner.client().endpoint(),
        }));
        Ok(())
    }

    /// List resources
    fn resources(&self) {
        for resource in Resource::ALL {
            let def = resource.def();
            let filters: Vec<JsonValue> = def
                .filters
                .iter()
                .map(|(name, ty)| json!({"name": name, "type": ty.as_str()}))
                .collect();
            self.output(&json!({
                "name": def.name,
                "defaultFields": def.default_fields,
                "filters": filters,
                "defaultPageDelayMs": def.default_page_delay.as_millis() as u64,
                "safeMode": def.supports_safe_mode,
            }));
        }
    }

    /// Run a single operation
    async fn execute(&self, operation: Operation) -> Result<()> {
        let mut runner = self.connect().await?;
        for record in runner.execute(&operation).await? {
            self.output(&record);
        }
        Ok(())
    }

    /// Run a batch file
    async fn run_items(&self, path: &Path, continue_on_fail: bool) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read items file {}", path.display()))?;
        let items = parse_items(&content)?;
        info!(items = items.len(), "loaded batch");

        let mut runner = self
            .connect()
            .await?
            .with_config(BatchConfig::new().with_continue_on_fail(continue_on_fail));

        for record in runner.run(&items).await? {
            self.output(&record);
        }
        Ok(())
    }

    /// Output a record in the configured format
    fn output(&self, value: &JsonValue) {
        println!("{}", self.cli.format.render(value));
    }
}
