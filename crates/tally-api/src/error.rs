//! # API Client Error Types
//!
//! Failures of a single backend call.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      API Error Categories                               │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  Rejected (4xx/5xx)     │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Decode                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  What the operator sees (`user_message()`):                            │
//! │    Rejected  → the backend's own message, verbatim                     │
//! │    InvalidInput → the local validation message                         │
//! │    anything else → "Unable to reach the server. Please try again."     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for API calls.
pub type ApiResult<T> = Result<T, ApiClientError>;

/// Message shown when the failure is not a backend rejection.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unable to reach the server. Please try again.";

#[derive(Debug, Error)]
pub enum ApiClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid API configuration: {0}")]
    InvalidConfig(String),

    /// Base URL or endpoint path could not be parsed.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Request input failed local validation; nothing was sent.
    #[error("{0}")]
    InvalidInput(#[from] tally_core::ValidationError),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection refused, DNS failure, TLS failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The configured request timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// The backend answered with a non-success status.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A success response whose body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ApiClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiClientError::Timeout
        } else if err.is_decode() {
            ApiClientError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiClientError::InvalidConfig(err.to_string())
        } else {
            ApiClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiClientError {
    fn from(err: serde_json::Error) -> Self {
        ApiClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ApiClientError {
    fn from(err: url::ParseError) -> Self {
        ApiClientError::InvalidUrl(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ApiClientError {
    /// Message to show the operator.
    ///
    /// Backend rejections and local validation failures are surfaced
    /// verbatim; everything else collapses to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            ApiClientError::Rejected { message, .. } => message.clone(),
            ApiClientError::InvalidInput(err) => err.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Returns true if running the same call again could succeed.
    ///
    /// Nothing in this crate retries; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiClientError::Network(_) | ApiClientError::Timeout => true,
            ApiClientError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the backend answered (as opposed to no answer at all).
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiClientError::Rejected { .. })
    }

    /// HTTP status of a rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let rejected = ApiClientError::Rejected {
            status: 422,
            message: "Coupon has expired".into(),
        };
        assert_eq!(rejected.user_message(), "Coupon has expired");

        assert_eq!(ApiClientError::Timeout.user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            ApiClientError::Decode("missing field".into()).user_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err: ApiClientError = tally_core::ValidationError::Required {
            field: "reason".into(),
        }
        .into();
        assert_eq!(err.user_message(), "reason is required");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ApiClientError::Timeout.is_retryable());
        assert!(ApiClientError::Network("refused".into()).is_retryable());
        assert!(ApiClientError::Rejected {
            status: 503,
            message: "busy".into()
        }
        .is_retryable());

        assert!(!ApiClientError::Rejected {
            status: 400,
            message: "bad".into()
        }
        .is_retryable());
        assert!(!ApiClientError::InvalidConfig("x".into()).is_retryable());
    }

    #[test]
    fn test_url_error_conversion() {
        let err: ApiClientError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ApiClientError::InvalidUrl(_)));
        assert_eq!(err.status(), None);
    }
}
