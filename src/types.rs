//! Common types used throughout the connector
//!
//! Shared type aliases and small value types used across modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Named GraphQL variables (ordered so generated documents are stable)
pub type ValueMap = BTreeMap<String, JsonValue>;

// ============================================================================
// Output Format
// ============================================================================

/// How emitted records are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One compact JSON document per line
    #[default]
    Json,
    /// Indented JSON
    Pretty,
}

impl OutputFormat {
    /// Render a single record
    pub fn render(self, value: &JsonValue) -> String {
        match self {
            Self::Json => serde_json::to_string(value).unwrap_or_default(),
            Self::Pretty => serde_json::to_string_pretty(value).unwrap_or_default(),
        }
    }
}
