//! Message types for the relay pipeline.
//!
//! This module defines the shapes exchanged between:
//! - the messaging platform webhook (inbound notifications)
//! - the completion provider (prompt in, candidates out)
//! - the messaging dispatch API (outbound replies)

use serde::{Deserialize, Serialize};

/// A user message extracted from an inbound webhook notification.
///
/// Only the first message of the first change of the first entry is
/// extracted; multi-message payloads are not iterated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Platform identifier of the sender (e.g. a phone number).
    pub sender_id: String,
    /// Plain text body of the message.
    pub text: String,
}

/// Request body for the completion provider.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// The prompt, already shaped by the configured prompt style.
    pub inputs: String,
    /// Provider tuning parameters, passed through unmodified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// A single generated completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub generated_text: String,
}

/// Response body from the completion provider.
///
/// The provider returns either a sequence of candidates or a single
/// candidate object; only the first candidate is ever used. Any other
/// shape fails deserialization and is handled as a malformed response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CompletionResult {
    Candidates(Vec<Candidate>),
    Single(Candidate),
}

impl CompletionResult {
    /// Generated text of the first candidate, if any.
    pub fn generated_text(&self) -> Option<&str> {
        match self {
            CompletionResult::Candidates(candidates) => {
                candidates.first().map(|c| c.generated_text.as_str())
            }
            CompletionResult::Single(candidate) => Some(candidate.generated_text.as_str()),
        }
    }
}

/// Reply submitted to the messaging dispatch API.
///
/// Fire-and-forget: submitted once per inbound message, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    /// Platform identifier of the recipient (the original sender).
    pub recipient_id: String,
    /// Reply text; never empty (fallbacks substitute for empty output).
    pub text: String,
}
