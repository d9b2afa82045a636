//! GraphQL-backed page fetcher

use super::resource::Resource;
use crate::error::{Error, Result};
use crate::http::GraphQLClient;
use crate::pagination::{PageFetcher, PageRequest, PageResult};
use crate::types::JsonValue;
use async_trait::async_trait;

/// Fetches pages of one resource with one query document
pub struct GraphQLPageFetcher<'a> {
    client: &'a GraphQLClient,
    resource: Resource,
    query: String,
}

impl<'a> GraphQLPageFetcher<'a> {
    /// Bind `query` to `resource`
    pub fn new(client: &'a GraphQLClient, resource: Resource, query: impl Into<String>) -> Self {
        Self {
            client,
            resource,
            query: query.into(),
        }
    }

    /// The query document sent for every page
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Split a root payload into records and total count
    pub fn extract_page(resource: Resource, payload: &JsonValue) -> Result<PageResult> {
        let shape = &resource.def().shape;
        let records = match payload.get(shape.records_field) {
            Some(JsonValue::Array(records)) => records.clone(),
            Some(JsonValue::Null) => Vec::new(),
            _ => return Err(Error::unexpected_shape(payload)),
        };

        let page = PageResult::new(records);
        let total = shape
            .total_field
            .and_then(|field| payload.get(field))
            .and_then(|v| v.as_u64().or_else(|| v.as_str()?.trim().parse().ok()));

        Ok(match total {
            Some(total) => page.with_total_count(total),
            None => page,
        })
    }
}

#[async_trait]
impl PageFetcher for GraphQLPageFetcher<'_> {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult> {
        let root = self.resource.def().shape.root_field;
        let payload = self
            .client
            .execute_field(&self.query, &request.variables(), root)
            .await?;
        Self::extract_page(self.resource, &payload)
    }
}
