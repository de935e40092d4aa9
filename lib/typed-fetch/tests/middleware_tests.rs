//! Integration tests for middleware functionality.

use typed_fetch::middleware::LoggingLayer;
use typed_fetch::tower::util::{MapRequestLayer, MapResponseLayer};
use typed_fetch::{
    CallOptions, ClientConfig, FetchClient, HttpClient, HyperClient, Method, Request, Response,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn tag_request(mut request: Request) -> Request {
    request.headers_mut().insert("X-Tagged", "yes");
    request
}

/// Test that logging middleware doesn't break request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"logged": true})))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_logging().build();

    let request = Request::builder(Method::Get, format!("{}/logged", mock_server.uri())).build();
    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
}

/// Test debug logging on HTTP errors.
#[tokio::test]
async fn test_debug_logging_on_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fail"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_debug_logging().build();

    let request = Request::builder(Method::Get, format!("{}/fail", mock_server.uri())).build();
    let response = client.execute(request).await.expect("response");

    assert_eq!(response.status(), 503);
}

/// Test generic layer API with a request-mapping layer.
#[tokio::test]
async fn test_generic_layer_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/custom-layer"))
        .and(header("X-Tagged", "yes"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .layer(MapRequestLayer::new(tag_request))
        .build();

    let request =
        Request::builder(Method::Get, format!("{}/custom-layer", mock_server.uri())).build();
    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
}

/// Test layers composed under the pipeline.
#[tokio::test]
async fn test_middleware_under_fetch_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/composed"))
        .and(header("X-Tagged", "yes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HyperClient::builder()
        .layer(MapRequestLayer::new(tag_request))
        .layer(MapResponseLayer::new(|response: Response| {
            let (_, headers, body) = response.into_parts();
            Response::new(502, headers, body)
        }))
        .layer(LoggingLayer::new())
        .build();
    let client = FetchClient::with_transport(
        ClientConfig::builder().base_url(mock_server.uri()).build(),
        transport,
    );

    let outcome = client
        .post("/composed", CallOptions::new())
        .await
        .expect("outcome");

    assert_eq!(outcome.response().status(), 502);
    assert_eq!(outcome.error(), Some(&serde_json::json!("boom")));
}
