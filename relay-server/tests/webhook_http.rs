//! HTTP integration tests for the webhook endpoints.
//!
//! Drives the full axum router with fake provider/dispatcher collaborators,
//! covering the handshake, delivery acknowledgement, and the
//! always-acknowledge failure semantics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use relaybot::relay::types::{Candidate, CompletionRequest, CompletionResult, OutboundReply};
use relaybot::web::router;
use relaybot::{
    AppState, CompletionProvider, Config, DispatchError, PromptStyle, ProviderError,
    ReplyDispatcher,
};

#[derive(Clone)]
struct FakeProvider {
    calls: Arc<AtomicUsize>,
    reply: Option<String>,
}

impl FakeProvider {
    fn replying(text: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            reply: Some(text.to_string()),
        }
    }

    fn timing_out() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            reply: None,
        }
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(
        &self,
        _request: &CompletionRequest,
    ) -> Result<CompletionResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(text) => Ok(CompletionResult::Candidates(vec![Candidate {
                generated_text: text.clone(),
            }])),
            None => Err(ProviderError::Timeout),
        }
    }
}

#[derive(Clone)]
struct FakeDispatcher {
    sent: Arc<Mutex<Vec<OutboundReply>>>,
    fail: bool,
}

impl FakeDispatcher {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    fn sent(&self) -> Vec<OutboundReply> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyDispatcher for FakeDispatcher {
    async fn send(&self, reply: &OutboundReply) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(reply.clone());
        if self.fail {
            Err(DispatchError::Status(500))
        } else {
            Ok(())
        }
    }
}

fn test_config() -> Config {
    Config {
        port: 0,
        verify_token: "my-secret".to_string(),
        provider_url: "http://provider.test".to_string(),
        provider_token: "provider-token".to_string(),
        provider_timeout: Duration::from_secs(30),
        provider_parameters: None,
        prompt_style: PromptStyle::Instruct,
        dispatch_url: "http://dispatch.test".to_string(),
        dispatch_token: "dispatch-token".to_string(),
        dispatch_timeout: Duration::from_secs(10),
        messaging_product: Some("whatsapp".to_string()),
        fallback_retry: "Sorry, I'm loading... try again in a second.".to_string(),
        fallback_error: "Sorry, I couldn't come up with a reply.".to_string(),
        fallback_greeting: "Hello! How can I help you?".to_string(),
    }
}

fn app(provider: FakeProvider, dispatcher: FakeDispatcher) -> axum::Router {
    let state = AppState::new(test_config(), Arc::new(provider), Arc::new(dispatcher));
    router(state)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn text_notification(from: &str, body: &str) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "changes": [{
                "value": {
                    "messages": [{"from": from, "text": {"body": body}}]
                }
            }]
        }]
    })
}

fn post_webhook(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn handshake_echoes_challenge() {
    let app = app(FakeProvider::replying("unused"), FakeDispatcher::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/webhook?hub.mode=subscribe&hub.verify_token=my-secret&hub.challenge=1158201444")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "1158201444");
}

#[tokio::test]
async fn handshake_with_wrong_token_is_forbidden() {
    let app = app(FakeProvider::replying("unused"), FakeDispatcher::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/webhook?hub.mode=subscribe&hub.verify_token=guess&hub.challenge=1158201444")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(response).await, "Forbidden");
}

#[tokio::test]
async fn handshake_without_mode_is_bad_request() {
    let app = app(FakeProvider::replying("unused"), FakeDispatcher::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/webhook?hub.verify_token=my-secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delivery_relays_message_and_acknowledges() {
    let provider = FakeProvider::replying("[/INST] Hello there!");
    let dispatcher = FakeDispatcher::new();
    let app = app(provider.clone(), dispatcher.clone());

    let response = app
        .oneshot(post_webhook(&text_notification("15551234567", "Hi")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);

    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient_id, "15551234567");
    assert_eq!(sent[0].text, "Hello there!");
}

#[tokio::test]
async fn status_callback_is_acknowledged_without_outbound_calls() {
    let provider = FakeProvider::replying("unused");
    let dispatcher = FakeDispatcher::new();
    let app = app(provider.clone(), dispatcher.clone());

    let payload = json!({
        "object": "whatsapp_business_account",
        "entry": [{"changes": [{"value": {"statuses": [{"status": "delivered"}]}}]}]
    });

    let response = app.oneshot(post_webhook(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert!(dispatcher.sent().is_empty());
}

#[tokio::test]
async fn unparseable_body_is_acknowledged_with_error_status() {
    let provider = FakeProvider::replying("unused");
    let dispatcher = FakeDispatcher::new();
    let app = app(provider.clone(), dispatcher.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from("not json {"))
                .unwrap(),
        )
        .await
        .unwrap();

    // 200-class status so the platform does not retry-storm.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"status":"error"}"#);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn provider_timeout_still_acknowledges_and_sends_fallback() {
    let provider = FakeProvider::timing_out();
    let dispatcher = FakeDispatcher::new();
    let app = app(provider.clone(), dispatcher.clone());

    let response = app
        .oneshot(post_webhook(&text_notification("15551234567", "Hi")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "Sorry, I'm loading... try again in a second.");
}

#[tokio::test]
async fn dispatch_failure_does_not_change_acknowledgement() {
    let provider = FakeProvider::replying("Hello there!");
    let dispatcher = FakeDispatcher::failing();
    let app = app(provider.clone(), dispatcher.clone());

    let response = app
        .oneshot(post_webhook(&text_notification("15551234567", "Hi")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);
    assert_eq!(dispatcher.sent().len(), 1);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app(FakeProvider::replying("unused"), FakeDispatcher::new());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);
}
