use thiserror::Error;

/// Locally-recovered failures surfaced to the user as notices.
/// None of these abort the session; `retry` is always user-initiated.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An action needed source text but both buffers are empty.
    #[error("nothing to {action}: both the original and modified buffers are empty")]
    EmptyBuffer { action: &'static str },

    /// The API rejected the request with HTTP 401.
    #[error("unauthorized: the API rejected the request (check your API key or preview token)")]
    Unauthorized,

    /// An action tag outside the enumerated set reached the router.
    #[error("unknown action tag: {0:?}")]
    UnknownAction(String),

    /// Snippet intake failed; the session was not created.
    #[error("failed to read snippet from {origin}: {reason}")]
    SnippetRead { origin: String, reason: String },
}
