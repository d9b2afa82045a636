//! Collection listing

use super::fetcher::GraphQLPageFetcher;
use super::resource::Resource;
use crate::config::PaginationSettings;
use crate::error::Result;
use crate::http::GraphQLClient;
use crate::pagination::{
    PageCursor, PagedRecords, PaginationConfig, SafeModeFetcher, REMOTE_MAX_PAGE_SIZE,
};
use crate::query::FieldSet;
use crate::types::ValueMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Parameters of a `getMany` item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetManyParams {
    /// Resource to list
    pub resource: Resource,
    /// Selected field tokens; markers are ignored
    #[serde(default)]
    pub fields: Vec<String>,
    /// Filter variables by name
    #[serde(default)]
    pub filters: ValueMap,
    /// Walk every page
    #[serde(default)]
    pub fetch_all_pages: bool,
    /// Page size for fetch-all mode
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Requested inter-page delay in milliseconds
    #[serde(default)]
    pub page_delay_ms: Option<u64>,
    /// Offset for single-page mode
    #[serde(default)]
    pub offset: Option<u32>,
    /// Limit for single-page mode
    #[serde(default)]
    pub limit: Option<u32>,
    /// Reduced-query fallback on the first page (orders only, on by default)
    #[serde(default)]
    pub safe_mode: Option<bool>,
}

impl GetManyParams {
    /// Single-page listing of `resource` with defaults
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            fields: Vec::new(),
            filters: ValueMap::new(),
            fetch_all_pages: false,
            page_size: None,
            page_delay_ms: None,
            offset: None,
            limit: None,
            safe_mode: None,
        }
    }

    /// Effective field selection
    pub fn field_set(&self) -> FieldSet {
        FieldSet::from_tokens(&self.fields).or_defaults(self.resource.def().default_fields)
    }

    /// Whether the reduced-query fallback is armed
    pub fn safe_mode_enabled(&self) -> bool {
        self.resource.supports_safe_mode() && self.safe_mode.unwrap_or(true)
    }

    /// Cursor configuration for this item
    pub fn pagination_config(&self, settings: &PaginationSettings) -> PaginationConfig {
        let config = if self.fetch_all_pages {
            PaginationConfig::fetch_all(self.page_size.unwrap_or(REMOTE_MAX_PAGE_SIZE))
        } else {
            PaginationConfig::single_page(
                self.offset.unwrap_or(0),
                self.limit.unwrap_or(REMOTE_MAX_PAGE_SIZE),
            )
        };
        let delay = self
            .page_delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.resource.default_page_delay());
        settings.apply(config.page_delay(delay))
    }
}

/// List one resource
pub async fn get_many(
    client: &GraphQLClient,
    params: &GetManyParams,
    settings: &PaginationSettings,
) -> Result<PagedRecords> {
    let resource = params.resource;
    let filters = resource.coerce_filters(&params.filters)?;
    let fields = params.field_set();
    let config = params.pagination_config(settings);
    let builder = resource.query_builder(filters.keys());

    info!(
        resource = %resource,
        fetch_all = config.fetch_all_pages,
        page_size = config.page_size,
        fields = fields.len(),
        "listing resource"
    );

    let full = GraphQLPageFetcher::new(client, resource, builder.build(&fields));
    let reduced = fields
        .without_nested()
        .or_defaults(resource.def().default_fields)
        .without_nested();

    let records = if params.safe_mode_enabled() && fields.has_nested() && !reduced.is_empty() {
        debug!(reduced_fields = reduced.len(), "safe mode armed");
        let fallback = GraphQLPageFetcher::new(client, resource, builder.build(&reduced));
        let fetcher = SafeModeFetcher::new(full, fallback);
        PageCursor::new(&fetcher, config)
            .with_filters(filters)
            .run()
            .await?
    } else {
        PageCursor::new(&full, config)
            .with_filters(filters)
            .run()
            .await?
    };

    if records.auto_paginated {
        info!(resource = %resource, "{}", records.summary());
    }
    Ok(records)
}
