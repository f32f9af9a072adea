/*
[INPUT]:  Error sources (HTTP transport, remote API, serialization, session gating, IPN)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the NOWPayments adapter
#[derive(Error, Debug)]
pub enum NowPaymentsError {
    /// Caller supplied malformed input (empty id, empty withdrawal list, non-object payload)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A session-gated operation was called without a session token
    #[error("{operation} requires a session token; set `{field}` on the client (see `login`)")]
    AuthenticationRequired {
        operation: &'static str,
        field: &'static str,
    },

    /// Login exchange did not yield a session token
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Request did not complete within the configured timeout
    #[error("Request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// HTTP request failed (connection, TLS, protocol)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with a non-2xx status and a body that is not JSON
    #[error("Remote error (status {status}): {body}")]
    Remote { status: u16, body: String },

    /// 2xx response whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// IPN signature did not match the payload
    #[error("Invalid IPN signature")]
    InvalidSignature,

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Header name or value could not be encoded
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NowPaymentsError {
    /// Check if error indicates missing or rejected credentials
    pub fn is_auth_error(&self) -> bool {
        match self {
            NowPaymentsError::AuthenticationRequired { .. }
            | NowPaymentsError::Authentication { .. }
            | NowPaymentsError::InvalidSignature => true,
            NowPaymentsError::Remote { status, .. } => {
                *status == StatusCode::UNAUTHORIZED.as_u16()
                    || *status == StatusCode::FORBIDDEN.as_u16()
            }
            _ => false,
        }
    }

    /// Check if the failure happened in the network layer
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            NowPaymentsError::Http(_) | NowPaymentsError::Timeout { .. }
        )
    }

    /// Create a remote error from status code and raw body
    pub fn remote(status: StatusCode, body: impl Into<String>) -> Self {
        NowPaymentsError::Remote {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        NowPaymentsError::InvalidArgument(message.into())
    }
}

/// Result type alias for NOWPayments operations
pub type Result<T> = std::result::Result<T, NowPaymentsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_required_names_field() {
        let err = NowPaymentsError::AuthenticationRequired {
            operation: "create_payout",
            field: "session_token",
        };
        let message = err.to_string();
        assert!(message.contains("create_payout"));
        assert!(message.contains("`session_token`"));
        assert!(err.is_auth_error());
        assert!(!err.is_transport_error());
    }

    #[test]
    fn test_timeout_is_transport_error() {
        let err = NowPaymentsError::Timeout {
            duration: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "Request timed out after 30s");
        assert!(err.is_transport_error());
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_remote_error_creation() {
        let err = NowPaymentsError::remote(StatusCode::FORBIDDEN, "<html>denied</html>");
        match &err {
            NowPaymentsError::Remote { status, body } => {
                assert_eq!(*status, 403);
                assert_eq!(body, "<html>denied</html>");
            }
            _ => panic!("Expected Remote error variant"),
        }
        assert!(err.is_auth_error());
    }
}
