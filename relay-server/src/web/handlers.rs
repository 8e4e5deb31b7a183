//! Webhook endpoint handlers.
//!
//! Two routes share the `/webhook` path:
//! - GET: the platform's one-time verification handshake
//! - POST: message delivery, driving one relay cycle per request
//!
//! The POST handler acknowledges the platform with HTTP 200 no matter what
//! happens inside the pipeline; only an unparseable body downgrades the
//! acknowledgement to an error status in the response JSON (still 200, so
//! the platform does not retry-storm).

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dispatch::ReplyDispatcher;
use crate::provider::CompletionProvider;
use crate::relay::{relay_notification, RelayOutcome, RelayPolicy};
use crate::web::verify::{verify_handshake, Handshake};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub policy: Arc<RelayPolicy>,
    pub provider: Arc<dyn CompletionProvider>,
    pub dispatcher: Arc<dyn ReplyDispatcher>,
}

impl AppState {
    pub fn new(
        config: Config,
        provider: Arc<dyn CompletionProvider>,
        dispatcher: Arc<dyn ReplyDispatcher>,
    ) -> Self {
        let policy = RelayPolicy {
            prompt_style: config.prompt_style,
            parameters: config.provider_parameters.clone(),
            fallback_retry: config.fallback_retry.clone(),
            fallback_error: config.fallback_error.clone(),
            fallback_greeting: config.fallback_greeting.clone(),
        };
        Self {
            config: Arc::new(config),
            policy: Arc::new(policy),
            provider,
            dispatcher,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Verification Handshake (GET /webhook)
// =============================================================================

/// Query parameters of the verification handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Verification handshake endpoint.
///
/// Echoes the challenge back as plain text on success.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    let handshake = verify_handshake(
        params.mode.as_deref(),
        params.verify_token.as_deref(),
        params.challenge.as_deref(),
        &state.config.verify_token,
    );

    match handshake {
        Handshake::Accepted(challenge) => {
            info!("webhook_verified");
            (StatusCode::OK, challenge)
        }
        Handshake::Rejected => {
            warn!("webhook_verification_rejected");
            (StatusCode::FORBIDDEN, "Forbidden".to_string())
        }
        Handshake::Incomplete => {
            warn!("webhook_verification_incomplete");
            (StatusCode::BAD_REQUEST, "Bad Request".to_string())
        }
    }
}

// =============================================================================
// Message Delivery (POST /webhook)
// =============================================================================

/// Acknowledgement returned to the platform.
#[derive(Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

/// Message delivery endpoint.
///
/// Runs one relay cycle and acknowledges the notification. The raw body is
/// parsed here rather than through the JSON extractor so that malformed
/// payloads still get a 200-class acknowledgement.
pub async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<WebhookAck>) {
    let notification: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, body_length = body.len(), "webhook_body_unparseable");
            return (StatusCode::OK, Json(WebhookAck { status: "error" }));
        }
    };

    let outcome = relay_notification(
        &notification,
        &state.policy,
        state.provider.as_ref(),
        state.dispatcher.as_ref(),
    )
    .await;

    match outcome {
        RelayOutcome::Replied => info!("webhook_handled"),
        RelayOutcome::Ignored => info!("webhook_ignored"),
    }

    (StatusCode::OK, Json(WebhookAck { status: "ok" }))
}
