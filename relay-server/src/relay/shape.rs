//! Completion response shaping.
//!
//! Inference endpoints commonly echo the prompt back at the start of the
//! generated text. Shaping removes the echo, falls back to a configured
//! greeting when nothing is left, and substitutes the generic failure text
//! when the provider returned no usable candidate.

use tracing::warn;

use crate::relay::types::CompletionResult;
use crate::relay::RelayPolicy;

/// Turn a completion result into the text to dispatch.
///
/// Never returns an empty string: empty or unusable output is replaced by
/// the policy's fallback texts.
pub fn reply_text(result: &CompletionResult, prompt: &str, policy: &RelayPolicy) -> String {
    let Some(generated) = result.generated_text() else {
        warn!("completion_result_empty");
        return policy.fallback_error.clone();
    };

    let stripped = strip_echo(generated, prompt, policy.prompt_style.close_marker());

    if stripped.is_empty() {
        warn!(
            generated_length = generated.len(),
            "completion_result_all_echo"
        );
        policy.fallback_greeting.clone()
    } else {
        stripped
    }
}

/// Remove an echoed prompt from generated text.
///
/// Policy: remove the first occurrence of the full prompt as a substring,
/// then, if the prompt style has a close marker that still appears, keep
/// only the text after its last occurrence. The result is trimmed.
pub fn strip_echo(generated: &str, prompt: &str, close_marker: Option<&str>) -> String {
    let mut text = if !prompt.is_empty() {
        match generated.find(prompt) {
            Some(start) => {
                let mut rest = String::with_capacity(generated.len() - prompt.len());
                rest.push_str(&generated[..start]);
                rest.push_str(&generated[start + prompt.len()..]);
                rest
            }
            None => generated.to_string(),
        }
    } else {
        generated.to_string()
    };

    if let Some(marker) = close_marker {
        if let Some(pos) = text.rfind(marker) {
            text = text[pos + marker.len()..].to_string();
        }
    }

    text.trim().to_string()
}
