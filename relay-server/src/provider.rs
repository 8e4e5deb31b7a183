//! Completion provider client.
//!
//! Submits prompts to a hosted inference endpoint (Hugging Face
//! Inference-API shape) and classifies the failure modes the pipeline
//! cares about: timeout, "model loading", and malformed responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::info;

use crate::config::Config;
use crate::relay::types::{CompletionRequest, CompletionResult};

/// Completion provider failure modes.
///
/// `Timeout` and `Loading` are the transient conditions the pipeline maps
/// to the "try again" fallback; everything else maps to the generic one.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request timed out")]
    Timeout,
    #[error("provider is still loading the model")]
    Loading,
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("provider returned a malformed response: {0}")]
    Malformed(String),
}

/// Source of generated text for a prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, ProviderError>;
}

/// reqwest-backed provider client.
#[derive(Clone)]
pub struct HttpCompletionProvider {
    client: Client,
    url: String,
    token: String,
    timeout: Duration,
}

impl HttpCompletionProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            url: config.provider_url.clone(),
            token: config.provider_token.clone(),
            timeout: config.provider_timeout,
        }
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, ProviderError> {
        info!(
            prompt_length = request.inputs.len(),
            has_parameters = request.parameters.is_some(),
            timeout_seconds = self.timeout.as_secs(),
            "provider_call_starting"
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Http(e)
                }
            })?;

        let status = response.status();

        // The inference API answers 503 while the model is being loaded
        // into memory; the caller turns this into a "try again" reply.
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ProviderError::Loading);
        }

        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let result = response
            .json::<CompletionResult>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        info!(
            status_code = status.as_u16(),
            generated_length = result.generated_text().map(|t| t.len()).unwrap_or(0),
            "provider_call_complete"
        );

        Ok(result)
    }
}
