//! Error types for Cloud Controller operations.

use thiserror::Error;

/// Boxed error returned by a [`Transport`](crate::Transport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during Cloud Controller API operations.
#[derive(Debug, Error)]
pub enum CapiError {
    /// Configuration is missing or incomplete.
    #[error("CAPI configuration required: {0}")]
    ConfigMissing(String),

    /// The base address or a server-supplied link could not be parsed.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// The injected transport failed to execute the request.
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The operation's context was cancelled.
    #[error("Operation cancelled")]
    Cancelled,

    /// The operation's context deadline passed.
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// Reading a response body or building the HTTP client failed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The endpoint answered with a status other than the one it requires.
    #[error("unexpected status code {status_code}: {body}")]
    ApiError { status_code: u16, body: String },

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A 200 response lacked the field the lookup needs.
    #[error("empty results: no {resource} found")]
    EmptyResults { resource: &'static str },

    /// The polled task reached the FAILED state.
    #[error("task failed: {guid}")]
    TaskFailed { guid: String },
}

impl CapiError {
    /// Returns true if the error came from the context firing.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Returns the observed status code for [`CapiError::ApiError`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Result type alias for Cloud Controller operations.
pub type Result<T> = core::result::Result<T, CapiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_mentions_status_and_body() {
        let err = CapiError::ApiError {
            status_code: 503,
            body: "upstream down".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("upstream down"));
        assert_eq!(err.status_code(), Some(503));
    }

    #[test]
    fn test_task_failed_message() {
        let err = CapiError::TaskFailed {
            guid: "task-1".to_string(),
        };
        assert!(err.to_string().starts_with("task failed"));
        assert!(!err.is_cancelled());
    }
}
