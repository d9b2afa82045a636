//! Pagination types
//!
//! Page requests and results, the cursor's mutable state, and the
//! accumulated output of one paginator invocation.

use super::delay::DelayPolicy;
use crate::types::{JsonValue, ValueMap};
use serde_json::json;
use std::time::Duration;

/// Hard page-size cap enforced by the remote service
pub const REMOTE_MAX_PAGE_SIZE: u32 = 250;

/// Smallest inter-page delay
pub const MIN_PAGE_DELAY: Duration = Duration::from_millis(25);

/// Largest inter-page delay, also the cap for transient doubling
pub const MAX_PAGE_DELAY: Duration = Duration::from_millis(1000);

/// Page-count safety bound for one invocation
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Fixed sleep before retrying a transient fault
pub const DEFAULT_TRANSIENT_BACKOFF: Duration = Duration::from_millis(2000);

/// Consecutive transient faults tolerated at one offset
pub const DEFAULT_MAX_TRANSIENT_RETRIES: u32 = 5;

/// Clamp a requested page size into `[1, REMOTE_MAX_PAGE_SIZE]`
fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, REMOTE_MAX_PAGE_SIZE)
}

// ============================================================================
// Page Request / Result
// ============================================================================

/// One bounded fetch at a given offset
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Zero-based record offset
    pub offset: u32,
    /// Records requested, never above the remote cap
    pub limit: u32,
    /// Named GraphQL filter variables
    pub filters: ValueMap,
}

impl PageRequest {
    /// Create a request; the limit is clamped to the remote cap
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset,
            limit: clamp_limit(limit),
            filters: ValueMap::new(),
        }
    }

    /// Attach filter variables
    #[must_use]
    pub fn with_filters(mut self, filters: ValueMap) -> Self {
        self.filters = filters;
        self
    }

    /// All GraphQL variables for this page: filters plus `limit` and `offset`
    pub fn variables(&self) -> ValueMap {
        let mut vars = self.filters.clone();
        vars.insert("limit".to_string(), json!(self.limit));
        vars.insert("offset".to_string(), json!(self.offset));
        vars
    }
}

/// Records returned by one page fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    /// Records in server order
    pub records: Vec<JsonValue>,
    /// Total size of the collection, when the envelope reports it
    pub total_count: Option<u64>,
}

impl PageResult {
    /// Create a page result
    pub fn new(records: Vec<JsonValue>) -> Self {
        Self {
            records,
            total_count: None,
        }
    }

    /// Attach the envelope's total count
    #[must_use]
    pub fn with_total_count(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }

    /// Number of records on this page
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// A page is full when it returned exactly what was asked for
    pub fn is_full(&self, limit: u32) -> bool {
        self.records.len() == limit as usize
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Per-invocation pagination settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Walk every page instead of fetching one
    pub fetch_all_pages: bool,
    /// Page size (fetch-all) or limit (single page), within `[1, 250]`
    pub page_size: u32,
    /// Starting offset for single-page mode
    pub offset: u32,
    /// Requested inter-page delay; seeds the adaptive policy
    pub page_delay: Duration,
    /// Page-count safety bound
    pub max_pages: u32,
    /// Fixed sleep before retrying a transient fault
    pub transient_backoff: Duration,
    /// Consecutive transient faults tolerated at one offset
    pub max_transient_retries: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            fetch_all_pages: false,
            page_size: REMOTE_MAX_PAGE_SIZE,
            offset: 0,
            page_delay: Duration::from_millis(50),
            max_pages: DEFAULT_MAX_PAGES,
            transient_backoff: DEFAULT_TRANSIENT_BACKOFF,
            max_transient_retries: DEFAULT_MAX_TRANSIENT_RETRIES,
        }
    }
}

impl PaginationConfig {
    /// Walk all pages with the given page size
    pub fn fetch_all(page_size: u32) -> Self {
        Self {
            fetch_all_pages: true,
            page_size: clamp_limit(page_size),
            ..Self::default()
        }
    }

    /// Fetch exactly one page
    pub fn single_page(offset: u32, limit: u32) -> Self {
        Self {
            fetch_all_pages: false,
            page_size: clamp_limit(limit),
            offset,
            ..Self::default()
        }
    }

    /// Set the requested inter-page delay
    #[must_use]
    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Set the page-count safety bound (at least one page)
    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Set the transient-fault backoff
    #[must_use]
    pub fn transient_backoff(mut self, backoff: Duration) -> Self {
        self.transient_backoff = backoff;
        self
    }

    /// Set the per-offset transient retry cap
    #[must_use]
    pub fn max_transient_retries(mut self, retries: u32) -> Self {
        self.max_transient_retries = retries;
        self
    }
}

// ============================================================================
// State
// ============================================================================

/// Where a cursor is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorPhase {
    /// Not started
    #[default]
    Idle,
    /// A page request is in flight
    FetchingPage,
    /// Waiting out the adaptive delay between pages
    Sleeping,
    /// Waiting out the transient-fault backoff
    Retrying,
    /// Finished successfully
    Done,
    /// Finished with an error
    Failed,
}

impl CursorPhase {
    /// Terminal phases accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Mutable state owned by one paginator invocation
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Offset of the page being fetched
    pub current_offset: u32,
    /// Adaptive inter-page delay
    pub delay: DelayPolicy,
    /// Successful page fetches
    pub pages_fetched: u32,
    /// Network calls including failed attempts
    pub requests_made: u32,
    /// Records accumulated so far, in fetch order
    pub records: Vec<JsonValue>,
    /// Latest total count reported by the server
    pub total_count: Option<u64>,
    /// Lifecycle phase
    pub phase: CursorPhase,
}

impl PaginationState {
    /// Fresh state seeded from the configured delay
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            current_offset: if config.fetch_all_pages { 0 } else { config.offset },
            delay: DelayPolicy::seeded(config.page_delay),
            ..Self::default()
        }
    }

    /// Whether the cursor has finished
    pub fn is_done(&self) -> bool {
        self.phase.is_terminal()
    }
}

// ============================================================================
// Output
// ============================================================================

/// Records returned by one paginator invocation
#[derive(Debug, Clone, PartialEq)]
pub struct PagedRecords {
    /// Records in fetch order
    pub records: Vec<JsonValue>,
    /// Successful page fetches
    pub pages_fetched: u32,
    /// Page size (or limit) used
    pub page_size: u32,
    /// Latest total count reported by the server
    pub total_count: Option<u64>,
    /// Whether all pages were walked
    pub auto_paginated: bool,
    /// Network calls including failed attempts
    pub requests_made: u32,
    /// Adaptive delay at the end of the run
    pub final_delay: Duration,
}

impl PagedRecords {
    /// Number of records returned
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were returned
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Human-readable pagination summary
    pub fn summary(&self) -> String {
        let pages = if self.pages_fetched == 1 { "page" } else { "pages" };
        format!(
            "Auto-pagination: fetched {} records across {} {pages} (page size {})",
            self.records.len(),
            self.pages_fetched,
            self.page_size
        )
    }

    /// Records with pagination metadata merged into each object
    ///
    /// Auto-paginated output carries `_totalPagesFetched`, `_pageSize`,
    /// `_totalRecordsFetched` and `_paginationInfo`. Single-page output
    /// carries `_totalCount` when the server reported one. Non-object
    /// records pass through untouched.
    pub fn into_annotated(self) -> Vec<JsonValue> {
        let mut annotations = serde_json::Map::new();
        if self.auto_paginated {
            annotations.insert("_totalPagesFetched".into(), json!(self.pages_fetched));
            annotations.insert("_pageSize".into(), json!(self.page_size));
            annotations.insert("_totalRecordsFetched".into(), json!(self.records.len()));
            annotations.insert("_paginationInfo".into(), json!(self.summary()));
        } else if let Some(total) = self.total_count {
            annotations.insert("_totalCount".into(), json!(total));
        }

        if annotations.is_empty() {
            return self.records;
        }

        self.records
            .into_iter()
            .map(|mut record| {
                if let Some(obj) = record.as_object_mut() {
                    for (key, value) in &annotations {
                        obj.insert(key.clone(), value.clone());
                    }
                }
                record
            })
            .collect()
    }
}
