//! Integration tests for the HTTP API.
//!
//! Each test builds the full router (same assembly as `main.rs`) and drives it
//! with `tower::ServiceExt::oneshot`, so no listening socket is needed.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use microservice::{config::AppConfig, create_router, AppState};

// ---- Helpers ----------------------------------------------------------------

fn app() -> Router {
    create_router(AppState::new(AppConfig::default()))
}

fn app_with_body_limit(max_body_bytes: usize) -> Router {
    let mut config = AppConfig::default();
    config.http.max_body_bytes = max_body_bytes;
    create_router(AppState::new(config))
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---- /health ----------------------------------------------------------------

#[tokio::test]
async fn health_returns_healthy() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(body_json(response).await, json!({"status": "healthy"}));
}

#[tokio::test]
async fn health_rejects_post() {
    let response = app()
        .oneshot(
            Request::post("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---- /data ------------------------------------------------------------------

#[tokio::test]
async fn data_echoes_object_with_created() {
    let payload = json!({"name": "test", "value": 123});
    let response = app()
        .oneshot(post_json("/data", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["result"], "Data processed successfully");
    assert_eq!(body["input"], payload);
}

#[tokio::test]
async fn data_echoes_nested_and_non_object_values() {
    for payload in [
        json!({"a": {"b": [1, 2, {"c": null}]}, "unicode": "h\u{e9}llo"}),
        json!([1, "two", 3.5, false]),
        json!("just a string"),
        json!(42),
        json!(null),
    ] {
        let response = app()
            .oneshot(post_json("/data", payload.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "{}", payload);
        assert_eq!(body_json(response).await["input"], payload);
    }
}

#[tokio::test]
async fn data_echoes_big_integers_exactly() {
    let response = app()
        .oneshot(post_json(
            "/data",
            r#"{"id": 123456789012345678901234567890, "ratio": 0.10000000000000000001}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("123456789012345678901234567890"), "{}", text);
    assert!(text.contains("0.10000000000000000001"), "{}", text);
}

#[tokio::test]
async fn data_without_json_content_type_is_415() {
    let response = app()
        .oneshot(
            Request::post("/data")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from(r#"{"name":"test"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn data_with_malformed_json_is_400() {
    let response = app()
        .oneshot(post_json("/data", r#"{"name": "#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn data_over_body_limit_is_413() {
    let payload = json!({"blob": "x".repeat(256)}).to_string();
    let response = app_with_body_limit(64)
        .oneshot(post_json("/data", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn data_rejects_get() {
    let response = app()
        .oneshot(Request::get("/data").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---- Fallback and middleware --------------------------------------------------

#[tokio::test]
async fn unknown_path_is_json_404() {
    let response = app()
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let request_id = response.headers()["x-request-id"]
        .to_str()
        .unwrap()
        .to_string();
    let body = body_json(response).await;
    assert_eq!(body["error"], "No route for /nope");
    assert_eq!(body["request_id"], request_id);
}

#[tokio::test]
async fn every_response_has_unique_request_id() {
    let app = app();
    let first = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let second = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let first_id = first.headers()["x-request-id"].to_str().unwrap();
    let second_id = second.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(first_id.len(), 36);
    assert_ne!(first_id, second_id);
}
