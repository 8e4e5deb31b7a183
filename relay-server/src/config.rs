//! Configuration module for environment variable parsing.
//!
//! All configuration is read once from the process environment at startup;
//! nothing is persisted or hot-reloaded. Secrets and endpoint credentials
//! are required; everything else has a sensible default.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use crate::relay::PromptStyle;

/// Default completion endpoint (Hugging Face hosted inference).
const DEFAULT_PROVIDER_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2";

const DEFAULT_FALLBACK_RETRY: &str = "Sorry, I'm loading... try again in a second.";
const DEFAULT_FALLBACK_ERROR: &str = "Sorry, I couldn't come up with a reply. Please try again.";
const DEFAULT_FALLBACK_GREETING: &str = "Hello! How can I help you?";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret for the webhook verification handshake
    pub verify_token: String,

    /// Completion provider endpoint
    pub provider_url: String,

    /// Bearer token for the completion provider
    pub provider_token: String,

    /// Timeout for completion provider calls
    pub provider_timeout: Duration,

    /// Provider tuning parameters (JSON object), passed through unmodified
    pub provider_parameters: Option<serde_json::Value>,

    /// Prompt construction style ("raw" or "instruct")
    pub prompt_style: PromptStyle,

    /// Messaging dispatch endpoint (includes the sender account path)
    pub dispatch_url: String,

    /// Bearer token for the messaging dispatch API
    pub dispatch_token: String,

    /// Timeout for dispatch calls
    pub dispatch_timeout: Duration,

    /// Product identifier field for the dispatch body; empty env value
    /// omits the field for older API versions
    pub messaging_product: Option<String>,

    /// Reply sent when the provider timed out or is still loading
    pub fallback_retry: String,

    /// Reply sent when the provider failed or answered with garbage
    pub fallback_error: String,

    /// Reply sent when the generated text was pure prompt echo
    pub fallback_greeting: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails with context when a required credential is missing.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            verify_token: required("VERIFY_TOKEN")?,

            provider_url: env::var("PROVIDER_API_URL")
                .unwrap_or_else(|_| DEFAULT_PROVIDER_URL.to_string()),

            provider_token: required("PROVIDER_API_TOKEN")?,

            provider_timeout: parse_secs("PROVIDER_TIMEOUT_SECS", 30),

            provider_parameters: parse_json_object("PROVIDER_PARAMETERS"),

            prompt_style: parse_prompt_style("PROMPT_STYLE", PromptStyle::Instruct),

            dispatch_url: required("DISPATCH_API_URL")?,

            dispatch_token: required("DISPATCH_API_TOKEN")?,

            dispatch_timeout: parse_secs("DISPATCH_TIMEOUT_SECS", 10),

            messaging_product: parse_optional("MESSAGING_PRODUCT", Some("whatsapp")),

            fallback_retry: env::var("FALLBACK_RETRY")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_RETRY.to_string()),

            fallback_error: env::var("FALLBACK_ERROR")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_ERROR.to_string()),

            fallback_greeting: env::var("FALLBACK_GREETING")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_GREETING.to_string()),
        })
    }
}

/// Read a required environment variable.
fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} must be set", name))
}

/// Parse a whole-seconds duration with a default.
fn parse_secs(name: &str, default: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

/// Parse a JSON object from an environment variable.
///
/// Invalid JSON is logged and ignored rather than failing startup.
fn parse_json_object(name: &str) -> Option<serde_json::Value> {
    let raw = env::var(name).ok()?;
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            warn!(env_var = name, "Value is not a JSON object, ignoring");
            None
        }
        Err(e) => {
            warn!(env_var = name, error = %e, "Invalid JSON, ignoring");
            None
        }
    }
}

/// Parse a prompt style name, falling back to a default on unknown values.
fn parse_prompt_style(name: &str, default: PromptStyle) -> PromptStyle {
    match env::var(name) {
        Err(_) => default,
        Ok(raw) => PromptStyle::from_name(&raw).unwrap_or_else(|| {
            warn!(env_var = name, value = %raw, "Unknown prompt style, using default");
            default
        }),
    }
}

/// Optional string with a default; an explicitly empty value means "unset".
fn parse_optional(name: &str, default: Option<&str>) -> Option<String> {
    match env::var(name) {
        Err(_) => default.map(|s| s.to_string()),
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => Some(raw),
    }
}
