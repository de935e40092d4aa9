//! Integration tests for `HyperClient` and `FetchClient` using wiremock.

use serde::{Deserialize, Serialize};
use serde_json::json;
use typed_fetch::{
    CallOptions, ClientConfig, Data, Error, FetchClient, Form, HttpClient, HyperClient, Method,
    Params, ParseAs, Request,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn client_for(server: &MockServer) -> FetchClient {
    FetchClient::new(ClientConfig::builder().base_url(server.uri()).build())
}

// Transport

#[tokio::test]
async fn test_get_request() {
    let mock_server = MockServer::start().await;

    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, format!("{}/users/1", mock_server.uri()))
        .header("Accept", "application/json")
        .build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
    assert_eq!(response.status(), 200);

    let body: User = response.json().expect("json");
    assert_eq!(body, user);
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/not-found"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request =
        Request::builder(Method::Get, format!("{}/not-found", mock_server.uri())).build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_client_error());
    assert_eq!(response.text(), "Not Found");
}

#[tokio::test]
async fn test_connection_error() {
    let client = HyperClient::new();

    // Nothing listens on port 1
    let request = Request::builder(Method::Get, "http://127.0.0.1:1").build();

    let err = client.execute(request).await.expect_err("expected connection error");
    assert!(err.is_connection(), "Expected connection error, got: {err}");
}

#[tokio::test]
async fn test_relative_url_needs_base() {
    let client = FetchClient::new(ClientConfig::default());

    let err = client
        .get("/users/1", CallOptions::new())
        .await
        .expect_err("relative URL");
    assert!(matches!(err, Error::InvalidRequest(_)), "got: {err}");
}

#[tokio::test]
async fn test_response_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/with-headers"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Request-Id", "abc123")
                .set_body_json(json!({"ok": true})),
        )
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request =
        Request::builder(Method::Get, format!("{}/with-headers", mock_server.uri())).build();

    let response = client.execute(request).await.expect("response");

    assert_eq!(response.header("x-request-id"), Some("abc123"));
    assert_eq!(response.content_type(), Some("application/json"));
}

// Full pipeline

#[tokio::test]
async fn test_fetch_json_with_path_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/42"))
        .and(query_param("fields", "name,id"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "name": "Ann"})))
        .mount(&mock_server)
        .await;

    let client = FetchClient::new(
        ClientConfig::builder()
            .base_url(mock_server.uri())
            .header("Accept", "application/json")
            .build(),
    );
    let outcome = client
        .get(
            "/users/{id}",
            CallOptions::new().params(
                Params::new()
                    .path("id", 42)
                    .query("fields", json!(["name", "id"])),
            ),
        )
        .await
        .expect("outcome");

    let user: User = outcome.json().expect("data").expect("user");
    assert_eq!(
        user,
        User {
            id: 42,
            name: "Ann".to_string()
        }
    );
}

#[tokio::test]
async fn test_post_json_body() {
    let mock_server = MockServer::start().await;

    let input = User {
        id: 0,
        name: "Bob".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7, "name": "Bob"})))
        .mount(&mock_server)
        .await;

    let outcome = client_for(&mock_server)
        .post(
            "/users",
            CallOptions::new().body(typed_fetch::RequestBody::json(&input).expect("json")),
        )
        .await
        .expect("outcome");

    assert_eq!(outcome.response().status(), 201);
    assert_eq!(
        outcome.data().and_then(Data::as_json),
        Some(&json!({"id": 7, "name": "Bob"}))
    );
}

#[tokio::test]
async fn test_error_bodies_are_outcomes() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;
    Mock::given(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"code": 5})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let missing = client.get("/missing", CallOptions::new()).await.expect("outcome");
    assert!(missing.data().is_none());
    assert_eq!(missing.error(), Some(&json!("not found")));

    let broken = client.delete("/broken", CallOptions::new()).await.expect("outcome");
    assert_eq!(broken.error(), Some(&json!({"code": 5})));
    assert_eq!(broken.response().status(), 500);
}

#[tokio::test]
async fn test_no_content_and_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/gone"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;
    Mock::given(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let gone = client.delete("/gone", CallOptions::new()).await.expect("outcome");
    assert_eq!(gone.data(), Some(&Data::Json(json!({}))));

    // Content-Length: 0 lands in the error slot even on 200
    let empty = client.put("/empty", CallOptions::new()).await.expect("outcome");
    assert_eq!(empty.response().content_length(), Some("0"));
    assert!(empty.data().is_none());
    assert_eq!(empty.error(), Some(&json!({})));
}

#[tokio::test]
async fn test_cookies_and_header_layers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Cookie", "session=abc; theme=dark"))
        .and(header("X-Layer", "params"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&mock_server)
        .await;

    let client = FetchClient::new(
        ClientConfig::builder()
            .base_url(mock_server.uri())
            .header("X-Layer", "client")
            .build(),
    );
    let outcome = client
        .get(
            "/me",
            CallOptions::new()
                .header("X-Layer", "call")
                .parse_as(ParseAs::Text)
                .params(
                    Params::new()
                        .header("X-Layer", "params")
                        .cookie("session", "abc")
                        .cookie("theme", "dark"),
                ),
        )
        .await
        .expect("outcome");

    assert_eq!(outcome.data(), Some(&Data::Text("hello".to_string())));
}

#[tokio::test]
async fn test_multipart_upload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stored": true})))
        .mount(&mock_server)
        .await;

    let outcome = client_for(&mock_server)
        .post(
            "/upload",
            CallOptions::new()
                .header("Content-Type", "multipart/form-data")
                .json_body(json!({"title": "report", "pages": 3})),
        )
        .await
        .expect("outcome");
    assert!(outcome.is_success());

    let received = mock_server.received_requests().await.expect("recording");
    let request = received.first().expect("one request");
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .expect("content type");
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let form = Form::parse(content_type, &request.body).expect("multipart body");
    assert_eq!(form.text_fields(), [("title", "report"), ("pages", "3")]);
}

#[tokio::test]
async fn test_form_response() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                "access_token=t0k&expires_in=3600",
                "application/x-www-form-urlencoded",
            ),
        )
        .mount(&mock_server)
        .await;

    let outcome = client_for(&mock_server)
        .post("/token", CallOptions::new().parse_as(ParseAs::Form))
        .await
        .expect("outcome");

    let form = outcome.data().and_then(Data::as_form).expect("form data");
    assert_eq!(form.text_fields(), [("access_token", "t0k"), ("expires_in", "3600")]);
}
