//! Engine types
//!
//! Batch items, run configuration and statistics.

use crate::error::{Error, Result};
use crate::resources::{GetManyParams, ShipmentParams};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// One batch item, tagged by its `operation` member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Operation {
    /// List a resource
    GetMany(GetManyParams),
    /// Record a shipment
    SetShipment(ShipmentParams),
}

impl Operation {
    /// Decode an item
    pub fn from_item(item: &JsonValue) -> Result<Self> {
        serde_json::from_value(item.clone())
            .map_err(|e| Error::invalid_input("operation", e.to_string()))
    }

    /// Operation name as written in items
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetMany(_) => "getMany",
            Self::SetShipment(_) => "setShipment",
        }
    }
}

/// Configuration for a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Record failed items as `{"error": ...}` and keep going
    pub continue_on_fail: bool,
}

impl BatchConfig {
    /// Create a new batch config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set continue-on-fail mode
    #[must_use]
    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }
}

/// Statistics from a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Items processed
    pub items: usize,
    /// Items that failed
    pub errors: usize,
    /// Records emitted, excluding error records
    pub records_emitted: usize,
    /// Pages fetched across all listings
    pub pages_fetched: u64,
    /// GraphQL requests made, including retried attempts
    pub requests_made: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl BatchStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an item
    pub fn add_item(&mut self) {
        self.items += 1;
    }

    /// Count a failed item
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Add emitted records
    pub fn add_records(&mut self, count: usize) {
        self.records_emitted += count;
    }

    /// Add pagination counters of one listing
    pub fn add_pages(&mut self, pages: u32, requests: u32) {
        self.pages_fetched += u64::from(pages);
        self.requests_made += u64::from(requests);
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
