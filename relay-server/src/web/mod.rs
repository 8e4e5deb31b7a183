//! Web server module for the inbound webhook.
//!
//! Exposes three routes:
//! - `GET /health`: liveness probe
//! - `GET /webhook`: platform verification handshake
//! - `POST /webhook`: message delivery
//!
//! The relay pipeline runs inline in the POST handler; its external calls
//! are both timeout-bounded, so a hung provider cannot hold a request slot
//! indefinitely.

pub mod handlers;
pub mod verify;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{
    health, receive_webhook, verify_webhook, AppState, HealthResponse, VerifyParams, WebhookAck,
};
pub use verify::{verify_handshake, Handshake};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
