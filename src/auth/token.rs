//! Client-credentials token exchange

use super::types::{AccessToken, Credentials};
use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Fetches bearer tokens with the OAuth2 client-credentials grant
pub struct TokenProvider {
    credentials: Credentials,
    http_client: Client,
}

impl TokenProvider {
    /// Create a token provider with its own HTTP client
    pub fn new(credentials: Credentials) -> Self {
        Self::with_client(credentials, Client::new())
    }

    /// Create a token provider sharing an existing HTTP client
    pub fn with_client(credentials: Credentials, http_client: Client) -> Self {
        Self {
            credentials,
            http_client,
        }
    }

    /// Perform one credential exchange
    pub async fn fetch_token(&self) -> Result<AccessToken> {
        let body = json!({
            "grant_type": "client_credentials",
            "client_id": self.credentials.client_id,
            "client_secret": self.credentials.client_secret,
        });

        debug!(token_url = %self.credentials.token_url, "requesting access token");

        let response = self
            .http_client
            .post(&self.credentials.token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::oauth2(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::oauth2(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let token: AccessToken = response
            .json()
            .await
            .map_err(|e| Error::oauth2(format!("Invalid token response: {e}")))?;

        if token.token.is_empty() {
            return Err(Error::oauth2("Token response contained an empty access_token"));
        }

        debug!(expires_in = ?token.expires_in, "access token acquired");
        Ok(token)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
