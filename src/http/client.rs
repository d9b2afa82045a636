//! GraphQL request executor
//!
//! Issues one POST per call with a `{query, variables}` body and decodes the
//! GraphQL envelope. Transport and status failures come back as structured
//! errors so the caller can classify them:
//! - 429/502/503/504 → `Error::HttpStatus`, transient
//! - other non-2xx → `Error::HttpStatus`, fatal
//! - 200 with `errors` and no data for the requested field → `Error::RemoteQuery`

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::AccessToken;
use crate::error::{Error, Result};
use crate::types::{JsonValue, ValueMap};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("onprintshop-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Decoded GraphQL response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQLResponse {
    /// `data` member, if any
    #[serde(default)]
    pub data: Option<JsonValue>,
    /// `errors` member, if any
    #[serde(default)]
    pub errors: Option<Vec<JsonValue>>,
}

impl GraphQLResponse {
    /// Whether the envelope carries a non-empty `errors` array
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Take the payload under `data.<field>`
    ///
    /// A present, non-null field wins even when `errors` is also set. Otherwise
    /// errors become `RemoteQuery` and anything else is an unexpected shape.
    pub fn into_field(self, field: &str) -> Result<JsonValue> {
        let has_errors = self.has_errors();
        let GraphQLResponse { data, errors } = self;

        let value = data
            .as_ref()
            .and_then(|d| d.get(field))
            .filter(|v| !v.is_null())
            .cloned();

        match value {
            Some(v) => Ok(v),
            None if has_errors => Err(Error::remote_query(&JsonValue::Array(
                errors.unwrap_or_default(),
            ))),
            None => Err(Error::unexpected_shape(&json!({
                "data": data,
                "errors": errors,
            }))),
        }
    }
}

/// GraphQL client bound to one endpoint
pub struct GraphQLClient {
    client: Client,
    endpoint: String,
    config: HttpClientConfig,
    token: Option<AccessToken>,
    rate_limiter: Option<RateLimiter>,
}

impl GraphQLClient {
    /// Create a client with default configuration
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_config(endpoint, HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(endpoint: impl Into<String>, config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config
            .rate_limit
            .as_ref()
            .map(RateLimiter::new)
            .transpose()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            config,
            token: None,
            rate_limiter,
        })
    }

    /// Attach the batch bearer token
    #[must_use]
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    /// The GraphQL endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one GraphQL document
    pub async fn execute(&self, query: &str, variables: &ValueMap) -> Result<GraphQLResponse> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let body = json!({
            "query": query.trim(),
            "variables": variables,
        });

        let mut req = self.client.post(&self.endpoint).json(&body);
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(ref token) = self.token {
            req = token.apply(req);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if crate::error::is_transient_status(status.as_u16()) {
                warn!(status = status.as_u16(), "transient GraphQL transport failure");
            }
            return Err(Error::http_status(status.as_u16(), body));
        }

        let text = response.text().await?;
        let envelope = decode_envelope(text)?;

        debug!(
            endpoint = %self.endpoint,
            has_errors = envelope.has_errors(),
            "GraphQL request completed"
        );
        Ok(envelope)
    }

    /// Execute a document and take `data.<field>`
    pub async fn execute_field(
        &self,
        query: &str,
        variables: &ValueMap,
        field: &str,
    ) -> Result<JsonValue> {
        self.execute(query, variables).await?.into_field(field)
    }
}

/// Decode a 200 body, keeping the raw text when it is not a GraphQL envelope
fn decode_envelope(text: String) -> Result<GraphQLResponse> {
    let Ok(value) = serde_json::from_str::<JsonValue>(&text) else {
        return Err(Error::unexpected_shape(&JsonValue::String(text)));
    };
    serde_json::from_value(value).map_err(|_| Error::unexpected_shape(&JsonValue::String(text)))
}

impl std::fmt::Debug for GraphQLClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLClient")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .field("has_token", &self.token.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
