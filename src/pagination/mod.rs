//! Pagination module
//!
//! Offset/limit auto-pagination with adaptive pacing and transient-fault recovery.
//!
//! # Overview
//!
//! A [`PageCursor`] drives a [`PageFetcher`] across the pages of one
//! collection-valued query. In "fetch all" mode it walks offsets from 0 until
//! a short page arrives, sleeping an adaptive delay between pages and retrying
//! transient faults at the same offset. Reaching the page-count safety bound
//! fails the whole invocation; partial results are never returned.
//!
//! ```text
//!  Idle ─► FetchingPage ─┬─► Done        (short page / single page)
//!             ▲   ▲      ├─► Sleeping ──┐ (full page, bound not reached)
//!             │   └──────┼──────────────┘
//!             │          ├─► Retrying ──┐ (429/502/503/504)
//!             └──────────┼──────────────┘
//!                        └─► Failed      (fatal fault, retry cap, bound)
//! ```

mod cursor;
mod delay;
mod safe_mode;
mod types;

pub use cursor::{PageCursor, PageFetcher};
pub use delay::{DelayPolicy, FAST_RESPONSE, SLOW_RESPONSE};
pub use safe_mode::SafeModeFetcher;
pub use types::{
    CursorPhase, PageRequest, PageResult, PagedRecords, PaginationConfig, PaginationState,
    DEFAULT_MAX_PAGES, DEFAULT_MAX_TRANSIENT_RETRIES, DEFAULT_TRANSIENT_BACKOFF, MAX_PAGE_DELAY,
    MIN_PAGE_DELAY, REMOTE_MAX_PAGE_SIZE,
};
