//! Messaging dispatch API client.
//!
//! Sends the generated reply back to the original sender through the
//! platform's send-message endpoint (Meta Cloud-API shape). Dispatch is
//! fire-and-forget: failures are reported to the caller for logging but
//! never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::relay::types::OutboundReply;

/// Dispatch API failure modes.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("dispatch request timed out")]
    Timeout,
    #[error("dispatch request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dispatch API returned status {0}")]
    Status(u16),
}

/// Sink for outbound replies.
#[async_trait]
pub trait ReplyDispatcher: Send + Sync {
    async fn send(&self, reply: &OutboundReply) -> Result<(), DispatchError>;
}

/// Send-message request body.
///
/// Newer API versions require the product identifier field; older ones
/// reject it, so it is configurable and omitted when unset.
#[derive(Serialize)]
struct SendMessageBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    messaging_product: Option<&'a str>,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'static str,
    text: TextBody<'a>,
}

#[derive(Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

/// reqwest-backed dispatch client.
#[derive(Clone)]
pub struct HttpReplyDispatcher {
    client: Client,
    url: String,
    token: String,
    timeout: Duration,
    messaging_product: Option<String>,
}

impl HttpReplyDispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            url: config.dispatch_url.clone(),
            token: config.dispatch_token.clone(),
            timeout: config.dispatch_timeout,
            messaging_product: config.messaging_product.clone(),
        }
    }
}

#[async_trait]
impl ReplyDispatcher for HttpReplyDispatcher {
    async fn send(&self, reply: &OutboundReply) -> Result<(), DispatchError> {
        let body = SendMessageBody {
            messaging_product: self.messaging_product.as_deref(),
            to: &reply.recipient_id,
            message_type: "text",
            text: TextBody { body: &reply.text },
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchError::Timeout
                } else {
                    DispatchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status.as_u16()));
        }

        info!(
            recipient = %reply.recipient_id,
            text_length = reply.text.len(),
            status_code = status.as_u16(),
            "dispatch_complete"
        );

        Ok(())
    }
}
