//! Integration tests for `QvcClient::get_stock` using wiremock HTTP mocks.

use onair_core::{AvailabilityCode, StockStatus};
use onair_qvc::{QvcClient, QvcError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> QvcClient {
    QvcClient::with_base_url(base_url, 5, "onair-test/0.1", 0, 0)
        .expect("failed to build test QvcClient")
}

fn product_body() -> serde_json::Value {
    json!({
        "productName": "Cashmere knit",
        "colours": [
            { "colourName": "Navy", "sizes": [
                { "sizeName": "M", "ats": "Y" },
                { "sizeName": "L", "ats": "N" }
            ]}
        ]
    })
}

#[tokio::test]
async fn get_stock_parses_and_aggregates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/748849"))
        .and(query_param("response-depth", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_body()))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/products", server.uri()));
    let result = client.get_stock("748849").await.expect("should parse stock");

    assert_eq!(result.name, "Cashmere knit");
    assert_eq!(result.product_id, "748849");
    assert_eq!(result.variants.len(), 2);
    assert_eq!(result.variants[1].ats, AvailabilityCode::Unavailable);
    assert_eq!(result.overall_status, StockStatus::InStock);
}

#[tokio::test]
async fn get_stock_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/products", server.uri()));
    let err = client.get_stock("111111").await.unwrap_err();
    assert!(
        matches!(err, QvcError::NotFound { .. }),
        "expected NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn get_stock_reports_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/products", server.uri()));
    let err = client.get_stock("111111").await.unwrap_err();
    assert!(
        matches!(err, QvcError::UnexpectedStatus { status: 403, .. }),
        "expected UnexpectedStatus(403), got: {err:?}"
    );
}

#[tokio::test]
async fn get_stock_reports_malformed_body_as_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"colours": []})))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/products", server.uri()));
    let err = client.get_stock("111111").await.unwrap_err();
    assert!(err.is_parse_error(), "expected Deserialize, got: {err:?}");
}

#[tokio::test]
async fn get_stock_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_body()))
        .mount(&server)
        .await;

    let client = QvcClient::with_base_url(&format!("{}/products", server.uri()), 5, "onair-test/0.1", 1, 0)
        .expect("failed to build test QvcClient");
    let result = client.get_stock("748849").await.expect("retry should succeed");
    assert_eq!(result.overall_status, StockStatus::InStock);
}

#[tokio::test]
async fn get_stock_does_not_retry_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = QvcClient::with_base_url(&format!("{}/products", server.uri()), 5, "onair-test/0.1", 3, 0)
        .expect("failed to build test QvcClient");
    assert!(client.get_stock("111111").await.is_err());
}
