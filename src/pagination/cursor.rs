//! Auto-paginating cursor

use super::types::{
    CursorPhase, PageRequest, PageResult, PagedRecords, PaginationConfig, PaginationState,
};
use crate::error::{Error, Result};
use crate::types::ValueMap;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Fetches one page of a collection-valued query
///
/// Implementations are bound to one query and variable shape. Transport faults
/// must surface as `Error::HttpStatus` so transient ones can be retried;
/// GraphQL-level failures as `Error::RemoteQuery`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page described by `request`
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult> {
        (**self).fetch_page(request).await
    }
}

/// Drives a [`PageFetcher`] across pages
///
/// Each cursor owns its state and is consumed by [`PageCursor::run`].
pub struct PageCursor<'a> {
    fetcher: &'a dyn PageFetcher,
    config: PaginationConfig,
    filters: ValueMap,
    state: PaginationState,
}

impl<'a> PageCursor<'a> {
    /// Create a cursor over `fetcher`
    pub fn new(fetcher: &'a dyn PageFetcher, config: PaginationConfig) -> Self {
        let state = PaginationState::new(&config);
        Self {
            fetcher,
            config,
            filters: ValueMap::new(),
            state,
        }
    }

    /// Filter variables sent with every page
    #[must_use]
    pub fn with_filters(mut self, filters: ValueMap) -> Self {
        self.filters = filters;
        self
    }

    /// Current state
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Run to completion
    pub async fn run(mut self) -> Result<PagedRecords> {
        let result = if self.config.fetch_all_pages {
            self.fetch_all().await
        } else {
            self.fetch_single().await
        };

        match &result {
            Ok(output) => {
                self.transition(CursorPhase::Done);
                debug!(
                    records = output.len(),
                    pages = output.pages_fetched,
                    requests = output.requests_made,
                    "pagination finished"
                );
            }
            Err(e) => {
                self.transition(CursorPhase::Failed);
                warn!(
                    offset = self.state.current_offset,
                    pages = self.state.pages_fetched,
                    error = %e,
                    "pagination failed"
                );
            }
        }
        result
    }

    async fn fetch_single(&mut self) -> Result<PagedRecords> {
        let (page, _) = self.fetch_with_retry(self.config.page_size).await?;
        self.state.pages_fetched = 1;
        self.state.total_count = page.total_count;
        self.state.records = page.records;
        Ok(self.output(false))
    }

    async fn fetch_all(&mut self) -> Result<PagedRecords> {
        let page_size = self.config.page_size;

        loop {
            let (page, round_trip) = self.fetch_with_retry(page_size).await?;
            let full = page.is_full(page_size);

            self.state.pages_fetched += 1;
            if page.total_count.is_some() {
                self.state.total_count = page.total_count;
            }
            debug!(
                page = self.state.pages_fetched,
                offset = self.state.current_offset,
                records = page.record_count(),
                round_trip_ms = round_trip.as_millis() as u64,
                "page fetched"
            );
            self.state.records.extend(page.records);
            self.state.delay.observe(round_trip);

            if !full {
                break;
            }

            if self.state.pages_fetched >= self.config.max_pages {
                self.state.records.clear();
                return Err(Error::PaginationLimitExceeded {
                    max_pages: self.config.max_pages,
                });
            }

            self.state.current_offset = self.state.current_offset.saturating_add(page_size);
            self.transition(CursorPhase::Sleeping);
            tokio::time::sleep(self.state.delay.current()).await;
        }

        Ok(self.output(true))
    }

    /// Fetch the current offset, retrying transient faults in place
    ///
    /// Returns the page and the round-trip time of the successful attempt.
    async fn fetch_with_retry(&mut self, limit: u32) -> Result<(PageResult, Duration)> {
        let request =
            PageRequest::new(self.state.current_offset, limit).with_filters(self.filters.clone());
        let mut failures = 0;

        loop {
            self.transition(CursorPhase::FetchingPage);
            self.state.requests_made += 1;
            let started = Instant::now();

            match self.fetcher.fetch_page(&request).await {
                Ok(page) => return Ok((page, started.elapsed())),
                Err(e) if e.is_transient() => {
                    failures += 1;
                    let status = e.status().unwrap_or_default();
                    if failures > self.config.max_transient_retries {
                        return Err(Error::TransientRetriesExhausted {
                            offset: request.offset,
                            attempts: failures,
                            status,
                        });
                    }

                    self.state.delay.back_off();
                    self.transition(CursorPhase::Retrying);
                    warn!(
                        status,
                        offset = request.offset,
                        attempt = failures,
                        backoff_ms = self.config.transient_backoff.as_millis() as u64,
                        delay_ms = self.state.delay.current().as_millis() as u64,
                        "transient fault, retrying same offset"
                    );
                    tokio::time::sleep(self.config.transient_backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn transition(&mut self, next: CursorPhase) {
        trace!(from = ?self.state.phase, to = ?next, "cursor transition");
        self.state.phase = next;
    }

    fn output(&mut self, auto_paginated: bool) -> PagedRecords {
        PagedRecords {
            records: std::mem::take(&mut self.state.records),
            pages_fetched: self.state.pages_fetched,
            page_size: self.config.page_size,
            total_count: self.state.total_count,
            auto_paginated,
            requests_made: self.state.requests_made,
            final_delay: self.state.delay.current(),
        }
    }
}
