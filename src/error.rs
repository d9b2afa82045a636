//! Error types for the OnPrintShop connector
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the connector
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Failed to get access token: {message}")]
    OAuth2 { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Remote Query Errors
    // ============================================================================
    #[error("GraphQL Error: {errors}")]
    RemoteQuery { errors: String },

    #[error("Unexpected response format. Response: {response}")]
    UnexpectedResponseShape { response: String },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error(
        "Pagination limit exceeded: more than {max_pages} pages would be required. \
         Reduce the page size or disable 'fetch all pages' and paginate manually"
    )]
    PaginationLimitExceeded { max_pages: u32 },

    #[error("Gave up at offset {offset} after {attempts} transient failures (last HTTP {status})")]
    TransientRetriesExhausted {
        offset: u32,
        attempts: u32,
        status: u16,
    },

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an OAuth2 token error
    pub fn oauth2(message: impl Into<String>) -> Self {
        Self::OAuth2 {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a GraphQL error carrying the raw `errors` payload
    pub fn remote_query(errors: &serde_json::Value) -> Self {
        Self::RemoteQuery {
            errors: errors.to_string(),
        }
    }

    /// Create an unexpected response shape error
    pub fn unexpected_shape(response: &serde_json::Value) -> Self {
        Self::UnexpectedResponseShape {
            response: response.to_string(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a transient remote fault worth retrying in place
    pub fn is_transient(&self) -> bool {
        match self {
            Error::HttpStatus { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }

    /// Check if this error is a GraphQL-level error
    pub fn is_remote_query(&self) -> bool {
        matches!(self, Error::RemoteQuery { .. })
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Check if an HTTP status code is a transient remote fault
pub fn is_transient_status(status: u16) -> bool {
    matches!(status, 429 | 502 | 503 | 504)
}

/// Result type alias for the connector
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("client_id");
        assert_eq!(err.to_string(), "Missing required config field: client_id");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_pagination_limit_message() {
        let err = Error::PaginationLimitExceeded { max_pages: 100 };
        let msg = err.to_string();
        assert!(msg.contains("100 pages"));
        assert!(msg.contains("Reduce the page size"));
        assert!(msg.contains("paginate manually"));
    }

    #[test]
    fn test_remote_query_keeps_raw_payload() {
        let errors = json!([{"message": "Field 'foo' not found", "path": ["orders"]}]);
        let err = Error::remote_query(&errors);
        assert!(err.is_remote_query());
        assert_eq!(
            err.to_string(),
            r#"GraphQL Error: [{"message":"Field 'foo' not found","path":["orders"]}]"#
        );
    }

    #[test_case(429, true ; "too many requests")]
    #[test_case(502, true ; "bad gateway")]
    #[test_case(503, true ; "service unavailable")]
    #[test_case(504, true ; "gateway timeout")]
    #[test_case(500, false ; "internal server error")]
    #[test_case(400, false ; "bad request")]
    #[test_case(401, false ; "unauthorized")]
    #[test_case(404, false ; "not found")]
    fn test_is_transient(status: u16, expected: bool) {
        assert_eq!(Error::http_status(status, "").is_transient(), expected);
    }

    #[test]
    fn test_non_status_errors_are_not_transient() {
        assert!(!Error::config("test").is_transient());
        assert!(!Error::remote_query(&json!([])).is_transient());
        assert!(!Error::PaginationLimitExceeded { max_pages: 100 }.is_transient());
        assert!(!Error::invalid_input("orderId", "not a number").is_transient());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
