//! Message relay pipeline.
//!
//! One inbound-to-outbound cycle per webhook notification:
//!
//! ```text
//! notification → extract → prompt → completion provider → shape → dispatch
//! ```
//!
//! The pipeline absorbs every internal failure: provider trouble becomes a
//! fallback reply, dispatch trouble is logged and swallowed. The webhook
//! handler above it always acknowledges the platform with success.

pub mod extract;
pub mod prompt;
pub mod shape;
pub mod types;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::dispatch::ReplyDispatcher;
use crate::provider::{CompletionProvider, ProviderError};

pub use extract::{extract_message, Extraction};
pub use prompt::PromptStyle;
pub use types::{CompletionRequest, InboundMessage, OutboundReply};

/// Per-deployment pipeline policy.
///
/// The source material shipped four near-identical pipelines differing only
/// in prompt wrapping and fallback wording; this is that variation folded
/// into one configuration object.
#[derive(Debug, Clone)]
pub struct RelayPolicy {
    /// How message text becomes a provider prompt.
    pub prompt_style: PromptStyle,
    /// Provider tuning parameters, passed through unmodified.
    pub parameters: Option<Value>,
    /// Reply sent when the provider timed out or is still loading.
    pub fallback_retry: String,
    /// Reply sent when the provider failed or answered with garbage.
    pub fallback_error: String,
    /// Reply sent when the generated text was pure prompt echo.
    pub fallback_greeting: String,
}

/// What the pipeline did with a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// A reply was dispatched (or dispatch was attempted and failed).
    Replied,
    /// The notification carried no relayable user message.
    Ignored,
}

/// Run one relay cycle for an already-parsed notification payload.
///
/// Exactly one dispatch is attempted per extracted message; notifications
/// without a user message produce no outbound calls at all.
pub async fn relay_notification(
    notification: &Value,
    policy: &RelayPolicy,
    provider: &dyn CompletionProvider,
    dispatcher: &dyn ReplyDispatcher,
) -> RelayOutcome {
    let message = match extract_message(notification) {
        Extraction::Message(message) => message,
        Extraction::NotAMessage => {
            debug!("notification_ignored");
            return RelayOutcome::Ignored;
        }
        Extraction::Malformed(reason) => {
            warn!(reason = reason, "notification_malformed");
            return RelayOutcome::Ignored;
        }
    };

    info!(
        sender = %message.sender_id,
        text_length = message.text.len(),
        "message_received"
    );

    let prompt = policy.prompt_style.build_prompt(&message.text);
    let request = CompletionRequest {
        inputs: prompt.clone(),
        parameters: policy.parameters.clone(),
    };

    let text = match provider.complete(&request).await {
        Ok(result) => shape::reply_text(&result, &prompt, policy),
        Err(e @ (ProviderError::Timeout | ProviderError::Loading)) => {
            warn!(error = %e, "provider_unavailable");
            policy.fallback_retry.clone()
        }
        Err(e) => {
            error!(error = %e, "provider_call_failed");
            policy.fallback_error.clone()
        }
    };

    let reply = OutboundReply {
        recipient_id: message.sender_id,
        text,
    };

    // Fire-and-forget: the platform only cares that the notification was
    // acknowledged, not that the reply went through.
    match dispatcher.send(&reply).await {
        Ok(()) => info!(recipient = %reply.recipient_id, "reply_dispatched"),
        Err(e) => warn!(
            recipient = %reply.recipient_id,
            error = %e,
            "reply_dispatch_failed"
        ),
    }

    RelayOutcome::Replied
}
