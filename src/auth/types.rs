//! Auth configuration types

use serde::{Deserialize, Deserializer, Serialize};

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.onprintshop.com";

/// Default OAuth2 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://api.onprintshop.com/oauth/token";

/// OAuth2 client credentials for an OnPrintShop instance
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Base URL of the instance (GraphQL lives at `<base_url>/api/`)
    #[serde(default = "default_base_url", deserialize_with = "base_url_or_default")]
    pub base_url: String,
    /// Token endpoint URL
    #[serde(default = "default_token_url", deserialize_with = "token_url_or_default")]
    pub token_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

/// Blank or null endpoints fall back to the defaults
fn or_default(url: Option<String>, default: &str) -> String {
    match url {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => default.to_string(),
    }
}

fn base_url_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(or_default(Option::deserialize(deserializer)?, DEFAULT_BASE_URL))
}

fn token_url_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(or_default(Option::deserialize(deserializer)?, DEFAULT_TOKEN_URL))
}

impl Credentials {
    /// Create credentials pointing at the default endpoints
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: default_base_url(),
            token_url: default_token_url(),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = or_default(Some(url.into()), DEFAULT_BASE_URL);
        self
    }

    /// Override the token endpoint
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = or_default(Some(url.into()), DEFAULT_TOKEN_URL);
        self
    }

    /// GraphQL endpoint derived from the base URL
    pub fn graphql_url(&self) -> String {
        format!("{}/api/", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Bearer token valid for the remainder of one batch
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    /// The access token
    #[serde(rename = "access_token")]
    pub token: String,
    /// Token type reported by the server (usually "Bearer")
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime reported by the server, in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl AccessToken {
    /// Wrap a raw bearer token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_type: None,
            expires_in: None,
        }
    }

    /// Attach the token to a request
    pub fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(&self.token)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
