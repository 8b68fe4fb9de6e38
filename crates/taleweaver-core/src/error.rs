//! Story service error types.

use thiserror::Error;

/// A classified failure from a story service call.
///
/// Callers only branch on the class: not-found is the one condition the
/// generation poller may treat as transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The requested resource does not exist (yet).
    #[error("not found: {0}")]
    NotFound(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status other than 404.
    #[error("request failed with status {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns `true` for the not-found class of failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_found_is_classified_as_not_found() {
        assert!(ApiError::NotFound("/jobs/j1".into()).is_not_found());
        assert!(!ApiError::Network("connection refused".into()).is_not_found());
        assert!(
            !ApiError::Http {
                status: 500,
                message: "boom".into()
            }
            .is_not_found()
        );
        assert!(!ApiError::Decode("missing field".into()).is_not_found());
    }

    #[test]
    fn test_http_error_message_includes_status() {
        let err = ApiError::Http {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "request failed with status 503: unavailable");
    }
}
