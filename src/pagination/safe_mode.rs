//! Reduced-query fallback for the first page
//!
//! Large nested selections can make the remote service answer the first page
//! with a GraphQL error. When that happens the first page is retried with a
//! reduced query, and the reduced query is used for the rest of the run so
//! every record has the same shape.

use super::cursor::PageFetcher;
use super::types::{PageRequest, PageResult};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Wraps a full fetcher with a reduced fallback for the first page
pub struct SafeModeFetcher<P, F> {
    primary: P,
    fallback: F,
    first_page_settled: AtomicBool,
    degraded: AtomicBool,
}

impl<P, F> SafeModeFetcher<P, F> {
    /// Create a safe-mode fetcher
    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback,
            first_page_settled: AtomicBool::new(false),
            degraded: AtomicBool::new(false),
        }
    }

    /// Whether the reduced query is in use
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<P, F> PageFetcher for SafeModeFetcher<P, F>
where
    P: PageFetcher,
    F: PageFetcher,
{
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult> {
        if self.is_degraded() {
            return self.fallback.fetch_page(request).await;
        }

        let first_page = !self.first_page_settled.load(Ordering::Relaxed);
        match self.primary.fetch_page(request).await {
            Ok(page) => {
                self.first_page_settled.store(true, Ordering::Relaxed);
                Ok(page)
            }
            Err(e) if first_page && e.is_remote_query() => {
                warn!(error = %e, "first page failed, retrying with reduced query");
                self.degraded.store(true, Ordering::Relaxed);
                let page = self.fallback.fetch_page(request).await?;
                self.first_page_settled.store(true, Ordering::Relaxed);
                Ok(page)
            }
            Err(e) => Err(e),
        }
    }
}
