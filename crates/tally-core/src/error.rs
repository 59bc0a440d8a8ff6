//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Checkout / register rule violations            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-api errors (separate crate)                                     │
//! │  └── ApiClientError   - Rejected or failed HTTP requests               │
//! │                                                                         │
//! │  tally-terminal errors (app)                                           │
//! │  └── CommandError     - What the operator sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                     ApiClientError ─┴─► CommandError → operator        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` is raised BEFORE any network call. Nothing here is
//! fatal: the operator fixes the input and submits again.

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Checkout and register rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line could not be found.
    #[error("Product {product_id} is not in the cart")]
    LineNotFound {
        product_id: i64,
        variant_id: Option<i64>,
    },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Split tender parts do not add up to the payable total.
    ///
    /// ## User Workflow
    /// ```text
    /// Total: $100.00
    ///      │
    ///      ▼
    /// Cash $60.00 + Card $39.99 = $99.99
    ///      │
    ///      ▼
    /// SplitMismatch → "Split amounts do not match the total ..."
    ///      │
    ///      ▼
    /// Nothing is sent; operator corrects an amount
    /// ```
    #[error("Split amounts do not match the total: cash {cash} + card {card} = {entered}, total is {total}")]
    SplitMismatch {
        cash: Money,
        card: Money,
        entered: Money,
        total: Money,
    },

    /// Amount tendered is lower than the payable total.
    #[error("Amount paid {tendered} is less than the total {total}")]
    InsufficientTender { tendered: Money, total: Money },

    /// Store credit offered to the walk-in customer.
    #[error("Credit sales require a registered customer")]
    CreditRequiresNamedCustomer,

    /// Store credit without a due date.
    #[error("Credit sales require a due date")]
    MissingDueDate,

    /// Store credit due date earlier than today.
    #[error("Due date {due_date} is in the past (today is {today})")]
    DueDateInPast { due_date: NaiveDate, today: NaiveDate },

    /// Loyalty redemption below the program's minimum.
    #[error("At least {minimum} points are required to redeem, got {requested}")]
    LoyaltyBelowMinimum { requested: i64, minimum: i64 },

    /// The register close flow was driven out of order.
    #[error("Cannot {action} while the register close is {state}")]
    InvalidCloseTransition {
        state: &'static str,
        action: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true if the error came from a tender/payment rule.
    pub fn is_payment_error(&self) -> bool {
        matches!(
            self,
            CoreError::SplitMismatch { .. }
                | CoreError::InsufficientTender { .. }
                | CoreError::CreditRequiresNamedCustomer
                | CoreError::MissingDueDate
                | CoreError::DueDateInPast { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., non-numeric amount, bad date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
