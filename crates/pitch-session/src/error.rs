//! Error types for the proposal backend client.

/// Error from proposal backend operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backend could not be reached (connection refused, timeout, ...).
    #[error("proposal backend unavailable")]
    Unavailable(#[from] ureq::Error),

    /// The session or proposal does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend answered with an error status.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// The response body was not what the backend is supposed to send.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Reading a streamed reply failed part way through.
    #[error("reply stream interrupted")]
    Stream(#[from] std::io::Error),

    /// The conversation already finished; no more answers are accepted.
    #[error("proposal session is already complete")]
    Completed,

    /// Answers must contain non-whitespace text.
    #[error("answer is empty")]
    EmptyAnswer,
}

impl SessionError {
    /// Whether this is the distinct "does not exist" outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
