//! RelayBot - webhook-driven chat relay.
//!
//! Receives inbound chat messages from a messaging platform's webhook,
//! forwards the text to a hosted language-model inference endpoint, and
//! relays the generated reply back to the original sender.
//!
//! ## Architecture
//!
//! ```text
//! Platform webhook → Web Server → Relay Pipeline → Completion Provider
//!                                       ↓
//!                                 Dispatch API → original sender
//! ```

pub mod config;
pub mod dispatch;
pub mod provider;
pub mod relay;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{DispatchError, HttpReplyDispatcher, ReplyDispatcher};
pub use provider::{CompletionProvider, HttpCompletionProvider, ProviderError};
pub use relay::{relay_notification, PromptStyle, RelayOutcome, RelayPolicy};
pub use web::AppState;
