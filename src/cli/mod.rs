//! CLI module
//!
//! Command-line interface for the connector.
//!
//! # Commands
//!
//! - `check` - Fetch an access token
//! - `resources` - List resources, default fields and filters
//! - `get` - List one resource
//! - `set-shipment` - Record a shipment
//! - `run` - Run a batch of items

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
