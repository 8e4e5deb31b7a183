//! Prompt construction policies.
//!
//! Instruction-tuned models expect the user text wrapped in instruction
//! markers; plain completion models take it raw. The style is configuration,
//! not code, so the same pipeline serves both.

/// How the user's message text becomes a provider prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Pass the message text through unchanged.
    Raw,
    /// Wrap the text in `[INST] ... [/INST]` instruction markers.
    Instruct,
}

impl PromptStyle {
    /// Parse a style name from configuration ("raw" or "instruct").
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "raw" => Some(PromptStyle::Raw),
            "instruct" => Some(PromptStyle::Instruct),
            _ => None,
        }
    }

    /// Build the provider prompt for a message text.
    pub fn build_prompt(&self, text: &str) -> String {
        match self {
            PromptStyle::Raw => text.to_string(),
            PromptStyle::Instruct => format!("[INST] {} [/INST]", text),
        }
    }

    /// Marker that closes the instruction block, if the style has one.
    ///
    /// Used by response shaping: models frequently echo the prompt back,
    /// and everything up to the last close marker is echo.
    pub fn close_marker(&self) -> Option<&'static str> {
        match self {
            PromptStyle::Raw => None,
            PromptStyle::Instruct => Some("[/INST]"),
        }
    }
}
