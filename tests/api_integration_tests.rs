//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tokenstore::api::create_router;
use tokenstore::driver::MemoryDriver;
use tokenstore::AppState;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let state = AppState::new(Arc::new(MemoryDriver::new()), "memory");
    create_router(state)
}

async fn body_to_json(body: Body) -> Json {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/set", r#"{"key":"test_key","value":"test_value"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("test_key"));
    assert_eq!(json["immutable"], false);
}

#[tokio::test]
async fn test_set_endpoint_empty_key() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/set", r#"{"key":"","value":"v"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_set_endpoint_malformed_json() {
    let app = create_test_app();

    let response = app.oneshot(put_json("/set", "{not json")).await.unwrap();

    assert!(response.status().is_client_error());
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_set_then_get_composite() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(put_json(
            "/set",
            r#"{"key":"claims","value":{"sub":"42","roles":["admin"]},"ttl":60}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/get/claims")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "claims");
    assert_eq!(json["value"]["sub"], "42");
    assert_eq!(json["value"]["roles"][0], "admin");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get("/get/missing")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_immutable_write_is_final() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json(
            "/set",
            r#"{"key":"jti","value":"first","immutable":true}"#,
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(put_json("/set", r#"{"key":"jti","value":"second"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/get/jti")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "first");
}

// == INT Endpoint Tests ==

#[tokio::test]
async fn test_int_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json("/set", r#"{"key":"n","value":"42"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(put_json("/set", r#"{"key":"word","value":"abc"}"#))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/int/n")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], 42);

    let response = app.clone().oneshot(get("/int/word")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/int/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == TTL / UPGRADE Endpoint Tests ==

#[tokio::test]
async fn test_ttl_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json("/set", r#"{"key":"s","value":1,"ttl":30}"#))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/ttl/s")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    let ttl = json["ttl"].as_i64().unwrap();
    assert!(ttl > 0 && ttl <= 30);

    let response = app.oneshot(get("/ttl/missing")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ttl"], -1);
}

#[tokio::test]
async fn test_upgrade_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json("/set", r#"{"key":"session","value":"s","ttl":5}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(put_json(
            "/set",
            r#"{"key":"token","value":"t","ttl":5,"immutable":true}"#,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/upgrade/session", r#"{"ttl":3600}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/ttl/session")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert!(json["ttl"].as_i64().unwrap() > 5);

    let response = app
        .oneshot(post_json("/upgrade/token", r#"{"ttl":3600}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Expiry Through The API ==

#[tokio::test(start_paused = true)]
async fn test_entry_expires_through_api() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json("/set", r#"{"key":"short","value":"v","ttl":1}"#))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let response = app.oneshot(get("/get/short")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["driver"], "memory");
    assert_eq!(json["stats"]["total_entries"], 0);
}
