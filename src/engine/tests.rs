//! Tests for engine module

use super::*;
use crate::auth::Credentials;
use crate::resources::Resource;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ConnectorConfig {
    ConnectorConfig::new(
        Credentials::new("client-1", "secret-1")
            .with_base_url(server.uri())
            .with_token_url(format!("{}/oauth/token", server.uri())),
    )
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-batch",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn faq_item() -> JsonValue {
    json!({"operation": "getMany", "resource": "faqs", "limit": 5})
}

// ============================================================================
// Operation Tests
// ============================================================================

#[test]
fn test_operation_from_item() {
    let op = Operation::from_item(&json!({
        "operation": "getMany",
        "resource": "orderDetails",
        "fetchAllPages": true,
        "pageSize": 50
    }))
    .unwrap();

    assert_eq!(op.name(), "getMany");
    match op {
        Operation::GetMany(params) => {
            assert_eq!(params.resource, Resource::OrderDetails);
            assert!(params.fetch_all_pages);
            assert_eq!(params.page_size, Some(50));
        }
        other => panic!("unexpected operation: {other:?}"),
    }

    let op = Operation::from_item(&json!({
        "operation": "setShipment",
        "orderId": "10",
        "shipmentId": 2,
        "trackingNumber": "T",
        "shipmentInfo": "[{\"packageinfo\": []}]"
    }))
    .unwrap();
    assert_eq!(op.name(), "setShipment");
}

#[test]
fn test_operation_from_item_rejects_unknown() {
    let err = Operation::from_item(&json!({"operation": "deleteOrder"})).unwrap_err();
    assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "operation"));

    let err = Operation::from_item(&json!({"operation": "getMany", "resource": "invoices"}))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

// ============================================================================
// Config / Stats Tests
// ============================================================================

#[test]
fn test_batch_config_default() {
    let config = BatchConfig::default();
    assert!(!config.continue_on_fail);
    assert!(BatchConfig::new().with_continue_on_fail(true).continue_on_fail);
}

#[test]
fn test_batch_stats() {
    let mut stats = BatchStats::new();
    stats.add_item();
    stats.add_item();
    stats.add_error();
    stats.add_records(7);
    stats.add_pages(3, 5);
    stats.set_duration(12);

    assert_eq!(stats.items, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.records_emitted, 7);
    assert_eq!((stats.pages_fetched, stats.requests_made), (3, 5));
    assert_eq!(stats.duration_ms, 12);
}

// ============================================================================
// Item Parsing Tests
// ============================================================================

#[test]
fn test_parse_items_array() {
    let items = parse_items(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
    assert_eq!(items, vec![json!({"a": 1}), json!({"a": 2})]);
}

#[test]
fn test_parse_items_lines() {
    let items = parse_items("{\"a\": 1}\n\n{\"a\": 2}\n").unwrap();
    assert_eq!(items.len(), 2);

    let items = parse_items("  {\"a\": 1}  ").unwrap();
    assert_eq!(items, vec![json!({"a": 1})]);

    assert!(parse_items("   ").unwrap().is_empty());
}

#[test]
fn test_parse_items_bad_line() {
    let err = parse_items("{\"a\": 1}\n{oops}\n").unwrap_err();
    assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "line 2"));
}

// ============================================================================
// Batch Runner Tests
// ============================================================================

#[tokio::test]
async fn test_connect_fetches_one_token_for_batch() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(header("Authorization", "Bearer tok-batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"faqs": {"totalFaqs": 1, "faqs": [{"faq_id": 1}]}}
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut runner = BatchRunner::connect(&config_for(&mock_server)).await.unwrap();
    let output = runner.run(&[faq_item(), faq_item()]).await.unwrap();

    assert_eq!(output.len(), 2);
    assert_eq!(output[0]["_totalCount"], 1);
    assert_eq!(runner.stats().items, 2);
    assert_eq!(runner.stats().records_emitted, 2);
    assert_eq!(runner.stats().requests_made, 2);
}

#[tokio::test]
async fn test_connect_token_failure_runs_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = BatchRunner::connect(&config_for(&mock_server))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, Error::OAuth2 { .. }));
    assert!(err.to_string().starts_with("Failed to get access token"));
}

#[tokio::test]
async fn test_connect_rejects_invalid_config() {
    let config = ConnectorConfig::new(Credentials::new("", "secret"));
    let err = BatchRunner::connect(&config).await.err().unwrap();
    assert!(matches!(err, Error::MissingConfigField { .. }));
}

#[tokio::test]
async fn test_run_stops_on_first_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"faqs": {"faqs": [{"faq_id": 1}]}}
        })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = GraphQLClient::new(format!("{}/api/", mock_server.uri())).unwrap();
    let mut runner = BatchRunner::new(client, PaginationSettings::default());

    let bad = json!({"operation": "getMany", "resource": "faqs", "filters": {"nope": 1}});
    let err = runner.run(&[bad, faq_item()]).await.unwrap_err();

    assert!(matches!(err, Error::InvalidInput { .. }));
    assert_eq!(runner.stats().items, 1);
    assert_eq!(runner.stats().errors, 1);
}

#[tokio::test]
async fn test_run_continue_on_fail_records_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"faqs": {"faqs": [{"faq_id": 1}]}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GraphQLClient::new(format!("{}/api/", mock_server.uri())).unwrap();
    let mut runner = BatchRunner::new(client, PaginationSettings::default())
        .with_config(BatchConfig::new().with_continue_on_fail(true));

    let bad_shipment = json!({
        "operation": "setShipment",
        "orderId": 1,
        "shipmentId": 1,
        "trackingNumber": "T",
        "shipmentInfo": "not json"
    });
    let output = runner.run(&[bad_shipment, faq_item()]).await.unwrap();

    assert_eq!(output.len(), 2);
    let message = output[0]["error"].as_str().unwrap();
    assert!(message.contains("Invalid JSON format for Shipment Info"));
    assert_eq!(output[0].as_object().unwrap().len(), 1);
    assert_eq!(output[1]["faq_id"], 1);
    assert_eq!(runner.stats().errors, 1);
    assert_eq!(runner.stats().records_emitted, 1);
}

#[tokio::test]
async fn test_execute_set_shipment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"setShipment": {"result": "success", "message": "ok"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GraphQLClient::new(format!("{}/api/", mock_server.uri())).unwrap();
    let mut runner = BatchRunner::new(client, PaginationSettings::default());
    let op = Operation::from_item(&json!({
        "operation": "setShipment",
        "orderId": 3,
        "shipmentId": 4,
        "trackingNumber": "TRK",
        "shipmentInfo": [{"packageinfo": [{"weight": 2}]}]
    }))
    .unwrap();

    let output = runner.execute(&op).await.unwrap();
    assert_eq!(output.len(), 1);
    assert_eq!(output[0]["_order_id"], 3);
    assert_eq!(output[0]["_packages_count"], 1);
}
