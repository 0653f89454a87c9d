use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use ed25519_dalek::{Signer, SigningKey};
use serde_json::{json, Value};
use tower::ServiceExt;

use interactions::dispatch::ComponentResponse;
use interactions::interaction::ComponentData;
use interactions::{build_router, AppState, Config, InteractionDispatcher, MessageData};

const TIMESTAMP: &str = "1700000000";

fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[42u8; 32])
}

fn config() -> Config {
    Config {
        discord_public_key: Some(hex::encode(signing_key().verifying_key().as_bytes())),
        ..Config::default()
    }
}

fn router(config: Config, dispatcher: InteractionDispatcher) -> Router {
    build_router(AppState::new(config, dispatcher))
}

fn sign(timestamp: &str, body: &[u8]) -> String {
    let mut message = timestamp.as_bytes().to_vec();
    message.extend_from_slice(body);
    hex::encode(signing_key().sign(&message).to_bytes())
}

fn interaction_request(signature: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/interactions")
        .header("X-Signature-Ed25519", signature)
        .header("X-Signature-Timestamp", TIMESTAMP)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn call(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.expect("call");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, bytes.to_vec())
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let body = r#"{"type":1}"#;
    let request = interaction_request(&sign(TIMESTAMP, body.as_bytes()), body);

    let (status, bytes) = call(
        router(config(), InteractionDispatcher::with_builtin_commands()),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, br#"{"type":1}"#);
}

#[tokio::test]
async fn tampered_body_is_rejected_with_empty_body() {
    let signature = sign(TIMESTAMP, br#"{"type":1}"#);
    let request = interaction_request(&signature, r#"{"type":1,"x":1}"#);

    let (status, bytes) = call(
        router(config(), InteractionDispatcher::with_builtin_commands()),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn foo_command_replies_bar() {
    let body = r#"{"type":2,"data":{"name":"foo"}}"#;
    let request = interaction_request(&sign(TIMESTAMP, body.as_bytes()), body);

    let (status, bytes) = call(
        router(config(), InteractionDispatcher::with_builtin_commands()),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, br#"{"type":4,"data":{"content":"bar"}}"#);
}

#[tokio::test]
async fn unknown_command_gets_fallback_message() {
    let body = r#"{"type":2,"data":{"name":"does-not-exist"}}"#;
    let request = interaction_request(&sign(TIMESTAMP, body.as_bytes()), body);

    let (status, bytes) = call(
        router(config(), InteractionDispatcher::with_builtin_commands()),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(
        value,
        json!({"type": 4, "data": {"content": interactions::UNKNOWN_COMMAND_MESSAGE}})
    );
}

#[tokio::test]
async fn unrouted_kind_is_bad_request() {
    let body = r#"{"type":3,"data":{"custom_id":"btn","component_type":2}}"#;
    let request = interaction_request(&sign(TIMESTAMP, body.as_bytes()), body);

    let (status, bytes) = call(
        router(config(), InteractionDispatcher::with_builtin_commands()),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let value: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(value["status"], "bad_request");
}

#[tokio::test]
async fn routed_component_is_answered() {
    let dispatcher = InteractionDispatcher::with_builtin_commands().with_component_handler(
        |c: &ComponentData| {
            ComponentResponse::UpdateMessage(MessageData::text(c.custom_id.clone()))
        },
    );
    let body = r#"{"type":3,"data":{"custom_id":"btn","component_type":2}}"#;
    let request = interaction_request(&sign(TIMESTAMP, body.as_bytes()), body);

    let (status, bytes) = call(router(config(), dispatcher), request).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(value, json!({"type": 7, "data": {"content": "btn"}}));
}

#[tokio::test]
async fn signed_garbage_is_bad_request() {
    let body = "definitely not json";
    let request = interaction_request(&sign(TIMESTAMP, body.as_bytes()), body);

    let (status, _) = call(
        router(config(), InteractionDispatcher::with_builtin_commands()),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_signature_headers_are_unauthorized() {
    let request = Request::builder()
        .method("POST")
        .uri("/interactions")
        .body(Body::from(r#"{"type":1}"#))
        .expect("request");

    let (status, bytes) = call(
        router(config(), InteractionDispatcher::with_builtin_commands()),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn missing_public_key_is_internal_error() {
    let body = r#"{"type":1}"#;
    let request = interaction_request(&sign(TIMESTAMP, body.as_bytes()), body);

    let (status, bytes) = call(
        router(Config::default(), InteractionDispatcher::with_builtin_commands()),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let value: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(value, json!({"status": "error"}));
}

#[tokio::test]
async fn malformed_public_key_is_internal_error() {
    let body = r#"{"type":1}"#;
    let request = interaction_request(&sign(TIMESTAMP, body.as_bytes()), body);
    let config = Config {
        discord_public_key: Some("not-hex".to_string()),
        ..Config::default()
    };

    let (status, _) = call(
        router(config, InteractionDispatcher::with_builtin_commands()),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("request");

    let router = router(Config::default(), InteractionDispatcher::new());
    let (status, bytes) = call(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(value["status"], "ok");
}
