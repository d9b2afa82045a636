// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # OnPrintShop Connector
//!
//! GraphQL integration for the OnPrintShop print-commerce API: OAuth2
//! client-credentials authentication, resource listings with adaptive
//! auto-pagination, and the shipment mutation.
//!
//! ## Features
//!
//! - **Auto-pagination**: offset walking with an adaptive inter-page delay
//! - **Transient retry**: 429/502/503/504 retried in place with a fixed backoff
//! - **Safety bound**: listings needing more than 100 pages fail closed
//! - **Safe mode**: reduced-query fallback when the first orders page errors
//! - **Batches**: items run in order under one bearer token
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use onprintshop_connector::{BatchRunner, ConnectorConfig, Result};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ConnectorConfig::from_file("onprintshop.yaml")?;
//!     let mut runner = BatchRunner::connect(&config).await?;
//!
//!     let records = runner
//!         .run(&[json!({"operation": "getMany", "resource": "orders", "fetchAllPages": true})])
//!         .await?;
//!     println!("{} orders", records.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    BatchRunner (engine)                    │
//! │   token once → items in order → records / {"error": ...}   │
//! └──────────────────────────────┬─────────────────────────────┘
//!                                │
//! ┌─────────────┬────────────────┴─────┬──────────┬────────────┐
//! │    Auth     │      Resources       │  Query   │    HTTP    │
//! ├─────────────┼──────────────────────┼──────────┼────────────┤
//! │ client      │ getMany → PageCursor │ FieldSet │ GraphQL    │
//! │ credentials │ setShipment          │ builder  │ Rate limit │
//! └─────────────┴──────────────────────┴──────────┴────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Common types and type aliases
pub mod types;

/// OAuth2 client-credentials authentication
pub mod auth;

/// GraphQL executor with optional rate limiting
pub mod http;

/// Auto-pagination engine
pub mod pagination;

/// Field selection and GraphQL document assembly
pub mod query;

/// Resource table and operations
pub mod resources;

/// Batch execution engine
pub mod engine;

/// Connector configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ConnectorConfig;
pub use engine::{BatchRunner, Operation};
pub use resources::Resource;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
