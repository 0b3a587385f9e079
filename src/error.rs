//! Error types for issue operations.
//!
//! Every failure a pending issue operation can settle with is an
//! [`IssueError`]. The updater never inspects the variant; it only forwards
//! the error to a failure reporter.

/// Errors produced by the issue transport and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    /// The request never produced a response (connection, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(String),

    /// The tracker answered with a non-success status.
    #[error("tracker returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// First error message reported by the tracker, or the raw body.
        message: String,
    },

    /// The response body could not be decoded into the expected payload.
    #[error("invalid response payload: {0}")]
    Decode(String),

    /// No issue exists with the requested key.
    #[error("issue not found: {0}")]
    NotFound(String),

    /// The client was configured or invoked inconsistently.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error captured in a cassette and served again during replay.
    #[error("{0}")]
    Replayed(String),
}

impl From<serde_json::Error> for IssueError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
