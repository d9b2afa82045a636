//! Tests for the auth module

use super::*;
use crate::error::Error;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials_for(server: &MockServer) -> Credentials {
    Credentials::new("client-1", "secret-1")
        .with_base_url(server.uri())
        .with_token_url(format!("{}/oauth/token", server.uri()))
}

#[tokio::test]
async fn test_fetch_token_client_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "grant_type": "client_credentials",
            "client_id": "client-1",
            "client_secret": "secret-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-abc",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = TokenProvider::new(credentials_for(&mock_server));
    let token = provider.fetch_token().await.unwrap();

    assert_eq!(token.token, "tok-abc");
    assert_eq!(token.token_type.as_deref(), Some("Bearer"));
    assert_eq!(token.expires_in, Some(3600));
}

#[tokio::test]
async fn test_fetch_token_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&mock_server)
        .await;

    let provider = TokenProvider::new(credentials_for(&mock_server));
    let err = provider.fetch_token().await.unwrap_err();

    assert!(matches!(err, Error::OAuth2 { .. }));
    let msg = err.to_string();
    assert!(msg.starts_with("Failed to get access token"));
    assert!(msg.contains("401"));
    assert!(msg.contains("invalid_client"));
}

#[tokio::test]
async fn test_fetch_token_missing_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .mount(&mock_server)
        .await;

    let provider = TokenProvider::new(credentials_for(&mock_server));
    let err = provider.fetch_token().await.unwrap_err();
    assert!(matches!(err, Error::OAuth2 { .. }));
}

#[tokio::test]
async fn test_fetch_token_unreachable() {
    let creds = Credentials::new("id", "secret").with_token_url("http://127.0.0.1:1/oauth/token");
    let provider = TokenProvider::new(creds);

    let err = provider.fetch_token().await.unwrap_err();
    assert!(matches!(err, Error::OAuth2 { .. }));
}

#[tokio::test]
async fn test_access_token_apply() {
    let token = AccessToken::new("my-bearer-token");
    let client = reqwest::Client::new();
    let req = token.apply(client.post("https://example.com/api/"));

    let built = req.build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer my-bearer-token"
    );
}
