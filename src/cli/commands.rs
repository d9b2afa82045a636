//! CLI commands and argument parsing

use crate::resources::Resource;
use crate::types::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// OnPrintShop GraphQL connector
#[derive(Parser, Debug)]
#[command(name = "onprintshop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, or JSON with a .json extension)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch an access token and report success
    Check,

    /// List resources with their default fields and filters
    Resources,

    /// List records of one resource
    Get {
        /// Resource to list
        resource: Resource,

        /// Fields to select (comma-separated, empty = resource defaults)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Filter as name=value (repeatable)
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// Walk every page
        #[arg(long)]
        all: bool,

        /// Page size when walking every page
        #[arg(long)]
        page_size: Option<u32>,

        /// Requested delay between pages in milliseconds
        #[arg(long)]
        page_delay_ms: Option<u64>,

        /// Offset of the single page
        #[arg(long)]
        offset: Option<u32>,

        /// Limit of the single page
        #[arg(long)]
        limit: Option<u32>,

        /// Disable the reduced-query fallback for orders
        #[arg(long)]
        no_safe_mode: bool,
    },

    /// Record a shipment against an order
    SetShipment {
        /// Order ID
        #[arg(long)]
        order_id: String,

        /// Shipment ID
        #[arg(long)]
        shipment_id: String,

        /// Carrier tracking number
        #[arg(long)]
        tracking_number: String,

        /// Shipment info JSON, e.g. '[{"packageinfo": [...]}]'
        #[arg(long)]
        shipment_info: String,
    },

    /// Run a batch of items from a JSON array or JSON-lines file
    Run {
        /// Items file
        #[arg(long)]
        items: PathBuf,

        /// Record failed items as {"error": ...} and keep going
        #[arg(long)]
        continue_on_fail: bool,
    },
}

fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}
