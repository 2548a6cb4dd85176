//! Tests for the HTTP routes

mod common;

use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

use sui_mcp_server::api::create_router;

use common::{test_state, CallLog, MockBackend};

fn app(dir: &std::path::Path) -> axum::Router {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let state = test_state(
        dir,
        MockBackend::new("resolution", log.clone()),
        MockBackend::new("execution", log),
    );
    create_router(state)
}

#[tokio::test]
async fn test_health_reports_network() {
    let dir = tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "status": "ok", "network": "testnet" }));
}

#[tokio::test]
async fn test_rpc_endpoint_serves_mcp() {
    let dir = tempdir().unwrap();
    let request = json!({ "jsonrpc": "2.0", "id": 7, "method": "tools/list" });
    let response = app(dir.path())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/rpc")
                .header("content-type", "application/json")
                .body(Body::from(request.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["id"], 7);
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 14);
}

#[tokio::test]
async fn test_rpc_endpoint_rejects_notifications() {
    let dir = tempdir().unwrap();
    let request = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    let response = app(dir.path())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/rpc")
                .header("content-type", "application/json")
                .body(Body::from(request.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], -32600);
}
