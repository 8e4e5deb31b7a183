//! Inbound notification payload extraction.
//!
//! The messaging platform wraps user messages several levels deep:
//!
//! ```text
//! { "object": ..., "entry": [ { "changes": [ { "value": { "messages": [ ... ] } } ] } ] }
//! ```
//!
//! The same webhook also delivers status callbacks and other non-message
//! events, which simply lack part of this path. Extraction is a single
//! tagged-result parse so that the "is this a user message at all" decision
//! is made in one place, independently of dispatch.

use serde_json::Value;

use crate::relay::types::InboundMessage;

/// Result of parsing an inbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A user text message to relay.
    Message(InboundMessage),
    /// A recognized notification that carries no user message
    /// (status callback, empty batch, non-text message). Ignored silently.
    NotAMessage,
    /// The message path exists but a field has the wrong shape.
    Malformed(&'static str),
}

/// Extract the first user message from a notification payload.
///
/// Missing links at any level of the nested path mean "not a message";
/// present-but-wrong-typed fields mean the payload is malformed.
pub fn extract_message(notification: &Value) -> Extraction {
    let Some(root) = notification.as_object() else {
        return Extraction::Malformed("top-level payload is not an object");
    };

    // Status callbacks and other platform events lack the object marker
    // or the entry list; they are not errors.
    if !root.contains_key("object") {
        return Extraction::NotAMessage;
    }

    let entry = match root.get("entry") {
        None => return Extraction::NotAMessage,
        Some(Value::Array(entries)) => match entries.first() {
            None => return Extraction::NotAMessage,
            Some(entry) => entry,
        },
        Some(_) => return Extraction::Malformed("entry is not an array"),
    };

    let change = match entry.get("changes") {
        None => return Extraction::NotAMessage,
        Some(Value::Array(changes)) => match changes.first() {
            None => return Extraction::NotAMessage,
            Some(change) => change,
        },
        Some(_) => return Extraction::Malformed("changes is not an array"),
    };

    let value = match change.get("value") {
        None => return Extraction::NotAMessage,
        Some(value) if value.is_object() => value,
        Some(_) => return Extraction::Malformed("value is not an object"),
    };

    let message = match value.get("messages") {
        None => return Extraction::NotAMessage,
        Some(Value::Array(messages)) => match messages.first() {
            None => return Extraction::NotAMessage,
            Some(message) => message,
        },
        Some(_) => return Extraction::Malformed("messages is not an array"),
    };

    let sender_id = match message.get("from") {
        Some(Value::String(from)) => from.clone(),
        Some(_) => return Extraction::Malformed("message sender is not a string"),
        None => return Extraction::Malformed("message is missing a sender"),
    };

    // Non-text messages (media, reactions, ...) have no text field.
    let text = match message.get("text") {
        None => return Extraction::NotAMessage,
        Some(text) => match text.get("body") {
            Some(Value::String(body)) => body.clone(),
            Some(_) => return Extraction::Malformed("message text body is not a string"),
            None => return Extraction::Malformed("message text has no body"),
        },
    };

    Extraction::Message(InboundMessage { sender_id, text })
}
