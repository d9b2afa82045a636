//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → token exchange → paginated
//! GraphQL requests → annotated JSON records

use onprintshop_connector::engine::{BatchConfig, BatchRunner};
use onprintshop_connector::{ConnectorConfig, Error};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_yaml(server: &MockServer, pagination: &str) -> ConnectorConfig {
    let yaml = format!(
        r#"
credentials:
  client_id: integration
  client_secret: secret
  base_url: {uri}
  token_url: {uri}/oauth/token
http:
  timeout_secs: 5
pagination:
{pagination}
"#,
        uri = server.uri()
    );
    ConnectorConfig::from_yaml_str(&yaml).unwrap()
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-int",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn orders(ids: &[u64]) -> Value {
    let records: Vec<Value> = ids.iter().map(|id| json!({"orders_id": id})).collect();
    json!({"data": {"orders": {"totalOrders": 5, "orders": records}}})
}

async fn mount_orders_page(server: &MockServer, offset: u32, ids: &[u64]) {
    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_partial_json(json!({"variables": {"offset": offset, "limit": 2}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders(ids)))
        .mount(server)
        .await;
}

async fn graphql_requests(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/api/")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

fn fetch_all_orders() -> Value {
    json!({
        "operation": "getMany",
        "resource": "orders",
        "fetchAllPages": true,
        "pageSize": 2,
        "pageDelayMs": 25
    })
}

// ============================================================================
// Auto-pagination
// ============================================================================

#[tokio::test]
async fn test_fetch_all_orders_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_orders_page(&mock_server, 0, &[1, 2]).await;
    mount_orders_page(&mock_server, 2, &[3, 4]).await;
    mount_orders_page(&mock_server, 4, &[5]).await;

    let config = config_yaml(&mock_server, "  max_pages: 100");
    let mut runner = BatchRunner::connect(&config).await.unwrap();
    let records = runner.run(&[fetch_all_orders()]).await.unwrap();

    let ids: Vec<u64> = records
        .iter()
        .map(|r| r["orders_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(records[0]["_totalPagesFetched"], 3);
    assert_eq!(records[0]["_pageSize"], 2);
    assert_eq!(records[4]["_totalRecordsFetched"], 5);
    assert_eq!(
        records[0]["_paginationInfo"],
        "Auto-pagination: fetched 5 records across 3 pages (page size 2)"
    );

    let requests = mock_server.received_requests().await.unwrap();
    let graphql: Vec<_> = requests.iter().filter(|r| r.url.path() == "/api/").collect();
    assert_eq!(graphql.len(), 3);
    for request in graphql {
        assert_eq!(
            request.headers.get("authorization").unwrap().to_str().unwrap(),
            "Bearer tok-int"
        );
    }
}

#[tokio::test]
async fn test_transient_fault_retries_same_offset() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_partial_json(json!({"variables": {"offset": 2}})))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_orders_page(&mock_server, 0, &[1, 2]).await;
    mount_orders_page(&mock_server, 2, &[3, 4]).await;
    mount_orders_page(&mock_server, 4, &[5]).await;

    let config = config_yaml(&mock_server, "  transient_backoff_ms: 10");
    let mut runner = BatchRunner::connect(&config).await.unwrap();
    let records = runner.run(&[fetch_all_orders()]).await.unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(runner.stats().pages_fetched, 3);
    assert_eq!(runner.stats().requests_made, 5);

    let offsets: Vec<u64> = graphql_requests(&mock_server)
        .await
        .iter()
        .map(|body| body["variables"]["offset"].as_u64().unwrap())
        .collect();
    assert_eq!(offsets, vec![0, 2, 2, 2, 4]);
}

#[tokio::test]
async fn test_retry_cap_fails_item() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = config_yaml(
        &mock_server,
        "  transient_backoff_ms: 5\n  max_transient_retries: 2",
    );
    let mut runner = BatchRunner::connect(&config).await.unwrap();
    let err = runner.run(&[fetch_all_orders()]).await.unwrap_err();

    assert!(matches!(
        err,
        Error::TransientRetriesExhausted {
            offset: 0,
            attempts: 3,
            status: 429
        }
    ));
}

#[tokio::test]
async fn test_page_limit_returns_nothing() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders(&[1, 2])))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = config_yaml(&mock_server, "  max_pages: 3");
    let mut runner = BatchRunner::connect(&config)
        .await
        .unwrap()
        .with_config(BatchConfig::new().with_continue_on_fail(true));
    let records = runner.run(&[fetch_all_orders()]).await.unwrap();

    assert_eq!(records.len(), 1);
    let message = records[0]["error"].as_str().unwrap();
    assert!(message.contains("3 pages"));
    assert!(message.contains("paginate manually"));
}

// ============================================================================
// Safe mode
// ============================================================================

#[tokio::test]
async fn test_safe_mode_reduced_query_for_whole_run() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("customers_first_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Internal server error"}]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_orders_page(&mock_server, 0, &[1, 2]).await;
    mount_orders_page(&mock_server, 2, &[3]).await;

    let config = config_yaml(&mock_server, "  max_pages: 100");
    let mut runner = BatchRunner::connect(&config).await.unwrap();
    let records = runner.run(&[fetch_all_orders()]).await.unwrap();

    assert_eq!(records.len(), 3);
    let bodies = graphql_requests(&mock_server).await;
    assert_eq!(bodies.len(), 3);
    for body in &bodies[1..] {
        let query = body["query"].as_str().unwrap();
        assert!(!query.contains("customer {"));
        assert!(!query.contains("product {"));
        assert!(query.contains("orders_id"));
    }
}

// ============================================================================
// Batches
// ============================================================================

#[tokio::test]
async fn test_mixed_batch_with_continue_on_fail() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("setShipment"))
        .and(header("authorization", "Bearer tok-int"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"setShipment": {"result": "success", "message": "Shipment added"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("faqs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"faqs": {"totalFaqs": 40, "faqs": [{"faq_id": 11}]}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let items = onprintshop_connector::engine::parse_items(
        r#"
{"operation": "getMany", "resource": "faqs", "offset": 10, "limit": 1}
{"operation": "setShipment", "orderId": "abc", "shipmentId": 1, "trackingNumber": "T", "shipmentInfo": []}
{"operation": "setShipment", "orderId": "1001", "shipmentId": 7, "trackingNumber": "1Z", "shipmentInfo": "[{\"packageinfo\": [{\"weight\": 2}]}]"}
"#,
    )
    .unwrap();

    let config = config_yaml(&mock_server, "  max_pages: 100");
    let mut runner = BatchRunner::connect(&config)
        .await
        .unwrap()
        .with_config(BatchConfig::new().with_continue_on_fail(true));
    let records = runner.run(&items).await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["faq_id"], 11);
    assert_eq!(records[0]["_totalCount"], 40);
    assert!(records[1]["error"].as_str().unwrap().contains("orderId"));
    assert_eq!(records[2]["message"], "Shipment added");
    assert_eq!(records[2]["_order_id"], 1001);
    assert_eq!(records[2]["_packages_count"], 1);

    assert_eq!(runner.stats().items, 3);
    assert_eq!(runner.stats().errors, 1);
}
