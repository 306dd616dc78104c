//! Action API Integration Tests

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use ringgate::application::{AutoTerminator, RingService};
use ringgate::domain::call::CallTransport;
use ringgate::infrastructure::{InMemoryDirectory, LoopbackTransport};
use ringgate::interface::api::{build_router, ActionRouter, AppState, CallPrivateRing};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot`

async fn setup_app() -> (Router, Arc<LoopbackTransport>) {
    let directory = InMemoryDirectory::new();
    directory.insert("10001", "u_alice").await;

    let transport = Arc::new(LoopbackTransport::new());
    let dyn_transport: Arc<dyn CallTransport> = transport.clone();
    let (terminator, _worker) = AutoTerminator::start(dyn_transport.clone());
    let service = RingService::new(Arc::new(directory), dyn_transport, terminator.clone());

    let mut actions = ActionRouter::new();
    actions.register(Arc::new(CallPrivateRing::new(Arc::new(service))));

    let state = AppState {
        actions: Arc::new(actions),
        terminator,
    };
    // Not installed globally, tests share one process
    let prometheus_handle = PrometheusBuilder::new().build_recorder().handle();

    (build_router(state, prometheus_handle), transport)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_api_call_private_ring() {
    let (app, transport) = setup_app().await;

    let response = app
        .oneshot(post("/call_private_ring", r#"{"user_id":"10001"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["retcode"], 0);
    assert_eq!(json["status"], "ok");
    assert!(json["data"]["call_id"].is_string());
    assert!(json["data"]["message"].is_string());
    assert!(json.get("error").is_none());

    assert_eq!(transport.started_calls().await.len(), 1);
}

#[tokio::test]
async fn test_api_query_string_action() {
    let (app, transport) = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/call_private_ring?user_id=10001")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["retcode"], 0);
    assert_eq!(transport.started_calls().await.len(), 1);
}

#[tokio::test]
async fn test_api_missing_body_fails_check() {
    let (app, transport) = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/call_private_ring")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["retcode"], 1400);
    assert_eq!(json["status"], "failed");
    assert!(json["error"].as_str().unwrap().contains("user_id"));
    assert!(transport.started_calls().await.is_empty());
}

#[tokio::test]
async fn test_api_unknown_target() {
    let (app, _transport) = setup_app().await;

    let response = app
        .oneshot(post("/call_private_ring", r#"{"user_id":20002}"#))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["retcode"], 100);
    assert_eq!(json["status"], "failed");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_api_unsupported_action() {
    let (app, _transport) = setup_app().await;

    let response = app.oneshot(post("/send_like", "{}")).await.unwrap();

    let json = body_json(response).await;
    assert_eq!(json["retcode"], 1404);
    assert_eq!(json["status"], "failed");
}

#[tokio::test]
async fn test_api_health() {
    let (app, _transport) = setup_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["actions"][0], "call_private_ring");
    assert_eq!(json["pending_cancellations"], 0);
}

#[tokio::test]
async fn test_api_metrics() {
    let (app, _transport) = setup_app().await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
