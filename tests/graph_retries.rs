//! Retry behaviour of the Graph directory client
//!
//! Pact interactions are stateless, so throttling sequences (503 then 200)
//! run against a wiremock server instead.

mod common;

use common::init_rustls;
use secret_expiry_reporter::auth::StaticTokenProvider;
use secret_expiry_reporter::config::ReporterConfig;
use secret_expiry_reporter::{DirectoryClient, GraphDirectoryClient};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, max_retries: u32) -> GraphDirectoryClient {
    let config = ReporterConfig {
        graph_endpoint: server.uri(),
        max_retries,
        backoff_start_ms: 0,
        ..ReporterConfig::default()
    };
    GraphDirectoryClient::new(&config, Arc::new(StaticTokenProvider::new("test-token")))
        .expect("Failed to create Graph client")
}

fn applications_page() -> serde_json::Value {
    json!({
        "value": [
            {
                "displayName": "billing-api",
                "appId": "0b6c5a1e-2f3d-4c5b-8a9e-1f2d3c4b5a6e",
                "passwordCredentials": [
                    {
                        "keyId": "6f1e2d3c-4b5a-6978-8a9b-0c1d2e3f4a5b",
                        "endDateTime": "2030-01-01T00:00:00Z"
                    }
                ]
            }
        ]
    })
}

fn applications_request() -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path("/v1.0/applications"))
        .and(query_param("$top", "999"))
        .and(header("authorization", "Bearer test-token"))
}

#[tokio::test]
async fn test_service_unavailable_is_retried_after_retry_after() {
    init_rustls();
    let server = MockServer::start().await;

    applications_request()
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    applications_request()
        .respond_with(ResponseTemplate::new(200).set_body_json(applications_page()))
        .expect(1)
        .mount(&server)
        .await;

    let objects = client(&server, 3)
        .fetch_applications()
        .await
        .expect("retry should recover the page");

    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].display_name, "billing-api");
}

#[tokio::test]
async fn test_throttling_without_retry_after_uses_backoff() {
    init_rustls();
    let server = MockServer::start().await;

    applications_request()
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    applications_request()
        .respond_with(ResponseTemplate::new(200).set_body_json(applications_page()))
        .expect(1)
        .mount(&server)
        .await;

    let objects = client(&server, 3)
        .fetch_applications()
        .await
        .expect("backoff retries should recover the page");

    assert_eq!(objects.len(), 1);
}

#[tokio::test]
async fn test_retries_are_bounded_by_max_retries() {
    init_rustls();
    let server = MockServer::start().await;

    // First attempt plus two retries
    applications_request()
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("Retry-After", "0")
                .set_body_json(json!({
                    "error": {
                        "code": "serviceNotAvailable",
                        "message": "The service is temporarily unavailable."
                    }
                })),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server, 2)
        .fetch_applications()
        .await
        .expect_err("persistent 503 must fail");

    let chain = format!("{err:#}");
    assert!(chain.contains("503"), "{chain}");
    assert!(chain.contains("serviceNotAvailable"), "{chain}");
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    init_rustls();
    let server = MockServer::start().await;

    applications_request()
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server, 3).fetch_applications().await.is_err());
}
