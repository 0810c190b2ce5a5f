//! Mocked HTTP tests for sending queries and parsing responses
//!
//! These tests verify that the query document is posted with the XML content
//! type, that the request happens once per query and that failures surface.

mod common;

use common::{SEARCH_RESPONSE, create_test_client};
use endeca_client_rs::{Dimension, EndecaError, FieldValue};
use serde_json::{Value, json};
use tracing_test::traced_test;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(mock_server: &MockServer) -> String {
    format!("{}/api", mock_server.uri())
}

#[tokio::test]
#[traced_test]
async fn test_query_posts_xml_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(header("content-type", "application/xml"))
        .and(body_string_contains("<search-term>boots</search-term>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_RESPONSE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&api(&mock_server), Value::Null);
    let query = client.query(json!({ "searches": { "All": "boots" } }));

    let response = query.response().await.unwrap();
    let root = response.root();

    assert_eq!(root.name(), "Response");
    assert_eq!(
        root.find(&["RecordsSet", "TotalRecordCount"]).unwrap().text(),
        "1"
    );
    assert_eq!(
        root.find(&["RecordsSet", "Record", "Name"]).unwrap().text(),
        "Trail boot"
    );
}

#[tokio::test]
#[traced_test]
async fn test_response_is_requested_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_RESPONSE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&api(&mock_server), Value::Null);
    let query = client.query(json!({ "category": "42" }));

    let first = query.response().await.unwrap();
    let second = query.response().await.unwrap();
    assert!(std::ptr::eq(first, second));

    let raw = query.transport_response().await.unwrap();
    assert_eq!(raw.status, 200);
}

#[tokio::test]
#[traced_test]
async fn test_each_query_sends_its_own_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_RESPONSE))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&api(&mock_server), Value::Null);

    for category in ["1", "2"] {
        let query = client.query(json!({ "category": category }));
        query.response().await.unwrap();
    }
}

#[tokio::test]
#[traced_test]
async fn test_default_options_reach_the_service() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("<DimensionValueId>9</DimensionValueId>"))
        .and(body_string_contains("<DimensionValueId>10</DimensionValueId>"))
        .and(body_string_contains("<RecordsPerPage>15</RecordsPerPage>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_RESPONSE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(
        &api(&mock_server),
        json!({ "dimensions": 9, "paging": { "perPage": 15 } }),
    );
    let query = client.query(json!({ "dimensions": [10] }));

    query.response().await.unwrap();
}

#[tokio::test]
#[traced_test]
async fn test_dimensions_from_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_RESPONSE))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&api(&mock_server), Value::Null);
    let query = client.query(json!({}));
    let response = query.response().await.unwrap();

    let dimensions: Vec<Dimension> = response
        .root()
        .descendants_named("Dimension")
        .into_iter()
        .map(Dimension::from_element)
        .collect();

    assert_eq!(dimensions.len(), 1);
    assert_eq!(dimensions[0].get("id"), FieldValue::Available("4000"));
    assert_eq!(dimensions[0].get("dimensionname").to_string(), "Color");
    assert_eq!(dimensions[0].get("multiselect").to_string(), "N/A");
    assert_eq!(
        dimensions[0].dimension_values()[0].get("Name").as_str(),
        Some("Brown")
    );
}

#[tokio::test]
#[traced_test]
async fn test_server_error_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&api(&mock_server), Value::Null);
    let query = client.query(json!({}));

    match query.response().await {
        Err(EndecaError::ApiError { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_malformed_response_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<Response><RecordsSet></Response>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&api(&mock_server), Value::Null);
    let query = client.query(json!({}));

    let result = query.response().await;
    assert!(matches!(result, Err(EndecaError::XmlParseError { .. })));
}

#[tokio::test]
async fn test_connection_failure_is_request_error() {
    let mock_server = MockServer::start().await;
    let api = api(&mock_server);
    drop(mock_server);

    let client = create_test_client(&api, Value::Null);
    let query = client.query(json!({}));

    let result = query.transport_response().await;
    assert!(matches!(result, Err(EndecaError::RequestError(_))));
}

#[tokio::test]
async fn test_invalid_endpoint_is_reported() {
    let client = create_test_client("::not-a-url::", Value::Null);
    let query = client.query(json!({}));

    match query.response().await {
        Err(EndecaError::InvalidUri { uri, .. }) => assert_eq!(uri, "::not-a-url::"),
        other => panic!("expected InvalidUri, got {other:?}"),
    }
}
