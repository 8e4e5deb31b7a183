//! Webhook verification handshake.
//!
//! The messaging platform proves endpoint ownership with a one-time GET
//! carrying `hub.mode`, `hub.verify_token`, and `hub.challenge` query
//! parameters. The endpoint must echo the challenge back verbatim if and
//! only if the mode is "subscribe" and the token matches the configured
//! shared secret.

/// Outcome of the verification handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handshake {
    /// Token matched; the challenge must be echoed back verbatim.
    Accepted(String),
    /// Mode or token mismatch.
    Rejected,
    /// Mode or token missing from the query.
    Incomplete,
}

/// Check a verification handshake against the configured secret.
///
/// Exact string equality only; no case folding, no partial matches.
pub fn verify_handshake(
    mode: Option<&str>,
    token: Option<&str>,
    challenge: Option<&str>,
    secret: &str,
) -> Handshake {
    let (Some(mode), Some(token)) = (mode, token) else {
        return Handshake::Incomplete;
    };

    if mode == "subscribe" && token == secret {
        Handshake::Accepted(challenge.unwrap_or_default().to_string())
    } else {
        Handshake::Rejected
    }
}
