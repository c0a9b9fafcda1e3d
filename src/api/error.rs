//! Error taxonomy for booking API operations

use thiserror::Error;

/// Shown when a request never reached the server or the connection dropped
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Failure of a single API operation.
///
/// Servers report problems with an explicit code rather than free-form text,
/// so callers decide where a message is displayed by matching on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server rejected the value of one specific field
    #[error("{message}")]
    Field { field: String, message: String },
    /// The server refused the request as a whole (bad credentials, expired session)
    #[error("{0}")]
    Rejected(String),
    /// The request could not be delivered
    #[error("network error: {0}")]
    Network(String),
    /// The request was cancelled before it completed
    #[error("request was cancelled")]
    Cancelled,
    /// Anything the client could not classify
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Create a field-level error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a request-level rejection
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Unexpected(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_displays_message_only() {
        let err = ApiError::field("email", "This email is already registered");
        assert_eq!(err.to_string(), "This email is already registered");
    }

    #[test]
    fn test_rejected_displays_message() {
        let err = ApiError::rejected("Invalid email or password");
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_network_error_is_prefixed() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
