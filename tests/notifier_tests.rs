use std::time::Duration;

use floorwatch::{
    error::DeliveryError,
    services::notifier::{Notifier, TelegramNotifier},
};
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn notifier(base: &str) -> TelegramNotifier {
    TelegramNotifier::new(
        base.to_string(),
        "123:abc".to_string(),
        Duration::from_secs(1),
        Duration::from_secs(2),
    )
    .unwrap()
}

#[tokio::test]
async fn sends_message_to_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_partial_json(json!({ "chat_id": 42, "text": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": {} })))
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server.uri()).send(42, "hello").await.unwrap();
}

#[tokio::test]
async fn rejection_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot was blocked by the user"
        })))
        .mount(&server)
        .await;

    let err = notifier(&server.uri()).send(42, "hello").await.unwrap_err();

    match err {
        DeliveryError::Rejected { status, description } => {
            assert_eq!(status, 403);
            assert!(description.contains("blocked"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_api_is_transport_error() {
    let err = notifier("http://127.0.0.1:1").send(42, "hello").await.unwrap_err();
    assert!(matches!(err, DeliveryError::Transport(_)));
}
