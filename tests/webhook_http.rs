//! HTTP-level tests for the action-server webhook contract.

#![cfg(feature = "server")]

mod helpers;

use std::sync::Arc;

use axum::body::Body;
use emotion_actions::actions::REPORT_SUCCESS_PREFIX;
use emotion_actions::server::build_router;
use emotion_actions::{ActionRegistry, SelectionStrategy};
use helpers::*;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn build_test_app(dir: &TempDir) -> axum::Router {
    let pipeline = pipeline(
        Arc::new(StubClassifier::new(vec![joy_scores()])),
        Arc::new(HtmlFileRenderer),
        report_config(dir, SelectionStrategy::First),
    );
    build_router(Arc::new(ActionRegistry::with_defaults(pipeline)))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_webhook(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn action_call(action: &str, user_texts: &[&str]) -> Value {
    let events: Vec<Value> = user_texts
        .iter()
        .map(|text| json!({"event": "user", "text": text, "timestamp": 1.0}))
        .collect();
    json!({
        "next_action": action,
        "sender_id": "webhook-user",
        "tracker": {
            "sender_id": "webhook-user",
            "slots": {},
            "latest_message": {},
            "events": events
        },
        "domain": {"intents": ["greet", "goodbye"]},
        "version": "3.6.0"
    })
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        build_test_app(&dir),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_lists_registered_actions() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        build_test_app(&dir),
        Request::get("/actions").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"name": "action_default_fallback"},
            {"name": "action_generate_report"},
            {"name": "action_hello_world"}
        ])
    );
}

#[tokio::test]
async fn test_fallback_and_greeting() {
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = send(
        build_test_app(&dir),
        post_webhook(action_call("action_hello_world", &[])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!([]));
    assert_eq!(body["responses"][0]["text"], "Hello World!");

    let (status, body) = send(
        build_test_app(&dir),
        post_webhook(action_call("action_default_fallback", &["???"])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["responses"][0]["text"],
        "I'm sorry, I didn't understand that. Can you please rephrase?"
    );
}

#[tokio::test]
async fn test_report_over_webhook() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        build_test_app(&dir),
        post_webhook(action_call("action_generate_report", &["I love this!"])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let text = body["responses"][0]["text"].as_str().unwrap();
    let (prefix, path) = text.split_once('\n').unwrap();
    assert_eq!(prefix, REPORT_SUCCESS_PREFIX);
    assert!(path.contains("emotion_report_webhook-user_"));
    let html = std::fs::read_to_string(path).unwrap();
    assert!(html.contains("Dominant Emotion: joy"));
}

#[tokio::test]
async fn test_unknown_action_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        build_test_app(&dir),
        post_webhook(action_call("action_does_not_exist", &[])),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["action_name"], "action_does_not_exist");
    assert_eq!(
        body["error"],
        "No registered action found for name 'action_does_not_exist'."
    );
}

#[tokio::test]
async fn test_missing_next_action_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        build_test_app(&dir),
        post_webhook(json!({"sender_id": "x", "tracker": {"events": []}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[tokio::test]
async fn test_sender_id_falls_back_to_call() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        build_test_app(&dir),
        post_webhook(json!({
            "next_action": "action_generate_report",
            "sender_id": "outer-sender",
            "tracker": {"events": [{"event": "user", "text": "fine"}]}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let text = body["responses"][0]["text"].as_str().unwrap();
    assert!(text.contains("emotion_report_outer-sender_"));
}

#[tokio::test]
async fn test_wrongly_typed_payload_is_400_json() {
    let dir = tempfile::tempdir().unwrap();
    for payload in [json!({"next_action": 5}), json!({"tracker": {"events": {}}})] {
        let response = build_test_app(&dir)
            .oneshot(post_webhook(payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "invalid_request");
        assert!(body["error"].as_str().unwrap().starts_with("invalid request:"));
    }
}

#[tokio::test]
async fn test_unparseable_json_is_400_json() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(build_test_app(&dir), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
