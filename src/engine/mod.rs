//! Batch execution engine
//!
//! # Overview
//!
//! The engine module provides:
//! - `BatchRunner` - Fetches one bearer token and runs items in order
//! - `Operation` - The decoded form of one item
//! - `BatchConfig` / `BatchStats` - Run configuration and counters
//!
//! Items run strictly one after another. A failed item aborts the batch
//! unless continue-on-fail is set, in which case it contributes a single
//! `{"error": "<message>"}` record.

mod types;

pub use types::{BatchConfig, BatchStats, Operation};

use crate::auth::TokenProvider;
use crate::config::{ConnectorConfig, PaginationSettings};
use crate::error::{Error, Result};
use crate::http::GraphQLClient;
use crate::resources::{get_many, set_shipment};
use crate::types::JsonValue;
use serde_json::json;
use std::time::Instant;
use tracing::{info, warn};

/// Runs batches of items against one OnPrintShop instance
pub struct BatchRunner {
    /// Authenticated GraphQL client
    client: GraphQLClient,
    /// Pagination limits
    settings: PaginationSettings,
    /// Batch configuration
    config: BatchConfig,
    /// Statistics
    stats: BatchStats,
}

impl BatchRunner {
    /// Create a runner over an already authenticated client
    pub fn new(client: GraphQLClient, settings: PaginationSettings) -> Self {
        Self {
            client,
            settings,
            config: BatchConfig::default(),
            stats: BatchStats::default(),
        }
    }

    /// Validate `config`, fetch the batch token and build the client
    ///
    /// Fails before any item runs when the token cannot be obtained.
    pub async fn connect(config: &ConnectorConfig) -> Result<Self> {
        config.validate()?;

        let token = TokenProvider::new(config.credentials.clone())
            .fetch_token()
            .await?;
        let client = GraphQLClient::with_config(
            config.credentials.graphql_url(),
            config.http.client_config(),
        )?
        .with_token(token);

        info!(endpoint = %client.endpoint(), "connected");
        Ok(Self::new(client, config.pagination.clone()))
    }

    /// Set batch configuration
    #[must_use]
    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the GraphQL client
    pub fn client(&self) -> &GraphQLClient {
        &self.client
    }

    /// Get statistics
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    /// Run one decoded operation
    pub async fn execute(&mut self, operation: &Operation) -> Result<Vec<JsonValue>> {
        match operation {
            Operation::GetMany(params) => {
                let records = get_many(&self.client, params, &self.settings).await?;
                self.stats
                    .add_pages(records.pages_fetched, records.requests_made);
                Ok(records.into_annotated())
            }
            Operation::SetShipment(params) => {
                let record = set_shipment(&self.client, params).await?;
                self.stats.add_pages(0, 1);
                Ok(vec![record])
            }
        }
    }

    /// Run every item in order
    pub async fn run(&mut self, items: &[JsonValue]) -> Result<Vec<JsonValue>> {
        let start = Instant::now();
        let mut output = Vec::new();

        for (index, item) in items.iter().enumerate() {
            self.stats.add_item();
            let result = match Operation::from_item(item) {
                Ok(operation) => {
                    info!(item = index, operation = operation.name(), "running item");
                    self.execute(&operation).await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(records) => {
                    self.stats.add_records(records.len());
                    output.extend(records);
                }
                Err(e) if self.config.continue_on_fail => {
                    warn!(item = index, error = %e, "item failed, continuing");
                    self.stats.add_error();
                    output.push(json!({"error": e.to_string()}));
                }
                Err(e) => {
                    self.stats.add_error();
                    self.stats.set_duration(start.elapsed().as_millis() as u64);
                    return Err(e);
                }
            }
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            items = self.stats.items,
            errors = self.stats.errors,
            records = self.stats.records_emitted,
            pages = self.stats.pages_fetched,
            duration_ms = self.stats.duration_ms,
            "batch completed"
        );
        Ok(output)
    }
}

/// Parse a batch file: a JSON array, a single object, or one object per line
pub fn parse_items(content: &str) -> Result<Vec<JsonValue>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    if let Ok(single) = serde_json::from_str::<JsonValue>(trimmed) {
        return Ok(vec![single]);
    }

    trimmed
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::invalid_input(format!("line {}", n + 1), e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests;
