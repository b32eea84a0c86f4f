use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// The backend could not be reached at all (connection refused, DNS, reset...).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success HTTP status.
    #[error("Backend returned status {status}: {body}")]
    Backend { status: u16, body: String },

    /// The backend answered, but the payload could not be decoded or was invalid.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents errors specific to the actor system, such as communication failures.
    #[error("Actor error: {0}")]
    Actor(#[from] crate::actors::messages::ActorError),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// A feedback action was dispatched on controls that were already resolved.
    #[error("Feedback already submitted for this message")]
    FeedbackClosed,

    /// A backend-only feature was used after the session latch tripped.
    #[error("Backend unavailable. Feedback features disabled.")]
    BackendUnavailable,
}

impl AppError {
    /// Whether this error means the remote classifier should not be used again this session.
    ///
    /// Transport failures and non-success statuses are treated the same way.
    pub fn disables_backend(&self) -> bool {
        matches!(
            self,
            AppError::Network(_)
                | AppError::Backend { .. }
                | AppError::Decode(_)
                | AppError::Timeout(_)
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Network(s) => AppError::Network(s.clone()),
            AppError::Backend { status, body } => AppError::Backend {
                status: *status,
                body: body.clone(),
            },
            AppError::Decode(s) => AppError::Decode(s.clone()),
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Actor(e) => AppError::Actor(e.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
            AppError::FeedbackClosed => AppError::FeedbackClosed,
            AppError::BackendUnavailable => AppError::BackendUnavailable,
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(format!("HTTP body error: {}", err))
        } else if err.is_timeout() {
            AppError::Timeout(format!("HTTP request timed out: {}", err))
        } else if let Some(status) = err.status() {
            AppError::Backend {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            AppError::Network(format!("HTTP error: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_and_backend_errors_disable_backend() {
        assert!(AppError::Network("refused".into()).disables_backend());
        assert!(AppError::Backend {
            status: 500,
            body: "boom".into()
        }
        .disables_backend());
        assert!(AppError::Decode("bad json".into()).disables_backend());
    }

    #[test]
    fn test_local_errors_do_not_disable_backend() {
        assert!(!AppError::Validation("empty".into()).disables_backend());
        assert!(!AppError::FeedbackClosed.disables_backend());
        assert!(!AppError::Config("bad".into()).disables_backend());
    }

    #[test]
    fn test_clone_preserves_backend_status() {
        let err = AppError::Backend {
            status: 503,
            body: "unavailable".into(),
        };
        match err.clone() {
            AppError::Backend { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("unexpected clone: {:?}", other),
        }
    }
}
