//! # Command Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally Terminal                         │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  CommandResult<T>                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Local precondition? ── CoreError / ValidationError ──┐                 │
//! │         │               (nothing was sent)            │                 │
//! │         ▼                                             ▼                 │
//! │  Backend call failed? ── ApiClientError ───────► CommandError ──► CLI   │
//! │         │                 user_message()         {code, message}        │
//! │         ▼                                                               │
//! │  Success ──────────────────────────────────────────────────────► CLI    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tally_api::ApiClientError;
use tally_core::{CoreError, ValidationError};

/// Result type alias for terminal commands.
pub type CommandResult<T> = Result<T, CommandError>;

/// Error returned from a terminal command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "PAYMENT_ERROR",
///   "message": "Credit sales require a registered customer"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Message to show the operator
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed before anything was sent
    ValidationError,

    /// Cart operation failed
    CartError,

    /// Tender does not cover the sale
    PaymentError,

    /// Register close attempted out of order
    RegisterError,

    /// Backend answered with an error
    Rejected,

    /// Backend could not be reached
    Unavailable,

    /// Configuration could not be loaded
    ConfigError,

    /// Anything else
    Internal,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CommandError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::ValidationError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::Validation(inner) => return CommandError::validation(inner.to_string()),
            CoreError::EmptyCart
            | CoreError::LineNotFound { .. }
            | CoreError::CartTooLarge { .. } => ErrorCode::CartError,
            CoreError::InvalidCloseTransition { .. } => ErrorCode::RegisterError,
            e if e.is_payment_error() => ErrorCode::PaymentError,
            _ => ErrorCode::ValidationError,
        };
        CommandError::new(code, err.to_string())
    }
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::validation(err.to_string())
    }
}

impl From<ApiClientError> for CommandError {
    fn from(err: ApiClientError) -> Self {
        let code = match &err {
            ApiClientError::Rejected { .. } => ErrorCode::Rejected,
            ApiClientError::InvalidInput(_) => ErrorCode::ValidationError,
            ApiClientError::InvalidConfig(_) | ApiClientError::InvalidUrl(_) => {
                tracing::error!(error = %err, "API client misconfigured");
                ErrorCode::ConfigError
            }
            _ => {
                tracing::error!(error = %err, "Backend call failed");
                ErrorCode::Unavailable
            }
        };
        CommandError::new(code, err.user_message())
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Money;

    #[test]
    fn test_core_error_codes() {
        let err: CommandError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.message, "Cart is empty");

        let err: CommandError = CoreError::CreditRequiresNamedCustomer.into();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let err: CommandError = CoreError::InsufficientTender {
            tendered: Money::from_cents(500),
            total: Money::from_cents(1_000),
        }
        .into();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let err: CommandError = CoreError::Validation(ValidationError::Required {
            field: "reason".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "reason is required");
    }

    #[test]
    fn test_rejection_keeps_backend_message() {
        let err: CommandError = ApiClientError::Rejected {
            status: 422,
            message: "Coupon has expired".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "Coupon has expired");
    }

    #[test]
    fn test_transport_failure_is_generic() {
        let err: CommandError = ApiClientError::Timeout.into();
        assert_eq!(err.code, ErrorCode::Unavailable);
        assert_eq!(err.message, tally_api::GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_serializes_code_and_message() {
        let err = CommandError::validation("reason is required");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "reason is required");
    }
}
