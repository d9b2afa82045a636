//! Connector configuration
//!
//! Credentials, HTTP client settings and pagination limits, loaded from a
//! YAML file or an inline JSON document.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{
    PaginationConfig, DEFAULT_MAX_PAGES, DEFAULT_MAX_TRANSIENT_RETRIES, DEFAULT_TRANSIENT_BACKOFF,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete connector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// OAuth2 credentials and endpoints
    pub credentials: Credentials,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpSettings,

    /// Pagination limits
    #[serde(default)]
    pub pagination: PaginationSettings,
}

impl ConnectorConfig {
    /// Config with default settings for `credentials`
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            http: HttpSettings::default(),
            pagination: PaginationSettings::default(),
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Check required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.credentials.client_id.trim().is_empty() {
            return Err(Error::missing_field("credentials.client_id"));
        }
        if self.credentials.client_secret.trim().is_empty() {
            return Err(Error::missing_field("credentials.client_secret"));
        }
        validate_url("credentials.base_url", &self.credentials.base_url)?;
        validate_url("credentials.token_url", &self.credentials.token_url)?;

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_config("http.timeout_secs", "must be at least 1"));
        }
        if let Some(ref limit) = self.http.rate_limit {
            if limit.requests_per_second == 0 || limit.burst_size == 0 {
                return Err(Error::invalid_config(
                    "http.rate_limit",
                    "requests_per_second and burst_size must be at least 1",
                ));
            }
        }
        if self.pagination.max_pages == 0 {
            return Err(Error::invalid_config("pagination.max_pages", "must be at least 1"));
        }
        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value)?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::invalid_config(
            field,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Optional request-rate ceiling
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Extra headers sent with every GraphQL request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: None,
            rate_limit: None,
            headers: HashMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl HttpSettings {
    /// Client configuration for these settings
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().timeout(Duration::from_secs(self.timeout_secs));
        builder = match self.rate_limit {
            Some(ref limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        for (key, value) in &self.headers {
            builder = builder.header(key.clone(), value.clone());
        }
        builder.build()
    }
}

// ============================================================================
// Pagination Settings
// ============================================================================

/// Batch-wide pagination limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSettings {
    /// Page-count safety bound per invocation
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Sleep before retrying a transient fault, in milliseconds
    #[serde(default = "default_transient_backoff_ms")]
    pub transient_backoff_ms: u64,

    /// Consecutive transient faults tolerated at one offset
    #[serde(default = "default_max_transient_retries")]
    pub max_transient_retries: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            transient_backoff_ms: default_transient_backoff_ms(),
            max_transient_retries: default_max_transient_retries(),
        }
    }
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_transient_backoff_ms() -> u64 {
    DEFAULT_TRANSIENT_BACKOFF.as_millis() as u64
}

fn default_max_transient_retries() -> u32 {
    DEFAULT_MAX_TRANSIENT_RETRIES
}

impl PaginationSettings {
    /// Apply these limits to a cursor configuration
    pub fn apply(&self, config: PaginationConfig) -> PaginationConfig {
        config
            .max_pages(self.max_pages)
            .transient_backoff(Duration::from_millis(self.transient_backoff_ms))
            .max_transient_retries(self.max_transient_retries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{DEFAULT_BASE_URL, DEFAULT_TOKEN_URL};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
credentials:
  client_id: abc
  client_secret: shh
"#;

        let config = ConnectorConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.credentials.client_id, "abc");
        assert_eq!(config.credentials.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.credentials.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.http, HttpSettings::default());
        assert_eq!(config.pagination, PaginationSettings::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
credentials:
  client_id: abc
  client_secret: shh
  base_url: https://shop.example.com/
  token_url: https://shop.example.com/oauth/token
http:
  timeout_secs: 10
  user_agent: custom/1.0
  rate_limit:
    requests_per_second: 4
  headers:
    X-Trace: "1"
pagination:
  max_pages: 20
  transient_backoff_ms: 500
  max_transient_retries: 2
"#;

        let config = ConnectorConfig::from_yaml_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.credentials.graphql_url(), "https://shop.example.com/api/");
        assert_eq!(config.http.rate_limit, Some(RateLimiterConfig::new(4, 1)));

        let client = config.http.client_config();
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert_eq!(client.user_agent, "custom/1.0");
        assert_eq!(client.default_headers.get("X-Trace"), Some(&"1".to_string()));

        let cursor = config.pagination.apply(PaginationConfig::fetch_all(50));
        assert_eq!(cursor.max_pages, 20);
        assert_eq!(cursor.transient_backoff, Duration::from_millis(500));
        assert_eq!(cursor.max_transient_retries, 2);
    }

    #[test]
    fn test_parse_inline_json() {
        let json = r#"{"credentials": {"client_id": "a", "client_secret": "b"}}"#;
        let config = ConnectorConfig::from_json_str(json).unwrap();
        assert_eq!(config.credentials.client_secret, "b");
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = ConnectorConfig::from_yaml_str("http:\n  timeout_secs: 5\n").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_validate_rejects_blank_secret() {
        let config = ConnectorConfig::new(Credentials::new("id", " "));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "credentials.client_secret"));
    }

    #[test]
    fn test_blank_urls_fall_back_to_defaults() {
        let yaml = r#"
credentials:
  client_id: abc
  client_secret: shh
  base_url: ""
  token_url: "  "
"#;

        let config = ConnectorConfig::from_yaml_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.credentials.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.credentials.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.credentials.graphql_url(), "https://api.onprintshop.com/api/");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let config = ConnectorConfig::new(Credentials::new("id", "secret").with_base_url("not a url"));
        assert!(matches!(config.validate().unwrap_err(), Error::InvalidUrl(_)));

        let config =
            ConnectorConfig::new(Credentials::new("id", "secret").with_token_url("ftp://host/token"));
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidConfigValue { ref field, .. } if field == "credentials.token_url"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = ConnectorConfig::new(Credentials::new("id", "secret"));
        config.pagination.max_pages = 0;
        assert!(config.validate().is_err());

        let mut config = ConnectorConfig::new(Credentials::new("id", "secret"));
        config.http.rate_limit = Some(RateLimiterConfig::new(0, 1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "credentials:\n  client_id: y\n  client_secret: s").unwrap();
        assert_eq!(ConnectorConfig::from_file(yaml.path()).unwrap().credentials.client_id, "y");

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"credentials": {{"client_id": "j", "client_secret": "s"}}}}"#).unwrap();
        assert_eq!(ConnectorConfig::from_file(json.path()).unwrap().credentials.client_id, "j");
    }

    #[test]
    fn test_from_file_missing() {
        let err = ConnectorConfig::from_file("/nonexistent/onprintshop.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
