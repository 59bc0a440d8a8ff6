//! # Validation Module
//!
//! Input validation for operator-entered values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI parsing (clap)                                           │
//! │  ├── Type checks (numbers, dates, enum values)                         │
//! │  └── Immediate usage errors                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Ranges, lengths, signs                                            │
//! │  └── Runs before any request is built                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  ├── Coupon eligibility, register state                                │
//! │  └── Persistence constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::validation::{validate_coupon_code, validate_quantity};
//!
//! validate_coupon_code("SUMMER-10").unwrap();
//! validate_quantity(5).unwrap();
//! assert!(tally_core::validation::validate_discount(Money::from_cents(-1)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest coupon code the backend stores.
pub const MAX_COUPON_CODE_LEN: usize = 50;

/// Longest cash movement reason.
pub const MAX_REASON_LEN: usize = 255;

/// Longest free-text note on a sale or register close.
pub const MAX_NOTE_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a coupon code and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Alphanumeric characters, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_coupon_code;
///
/// assert_eq!(validate_coupon_code("  WELCOME5 ").unwrap(), "WELCOME5");
/// assert!(validate_coupon_code("").is_err());
/// assert!(validate_coupon_code("two words").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }

    if code.chars().count() > MAX_COUPON_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "coupon code".to_string(),
            max: MAX_COUPON_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "coupon code".to_string(),
            reason: "only letters, numbers, hyphens, and underscores allowed".to_string(),
        });
    }

    Ok(code.to_string())
}

/// Validates the reason attached to a cash movement.
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.chars().count() > MAX_REASON_LEN {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: MAX_REASON_LEN,
        });
    }

    Ok(())
}

/// Validates an optional note. Missing notes are fine.
pub fn validate_note(note: Option<&str>) -> ValidationResult<()> {
    match note {
        Some(n) if n.chars().count() > MAX_NOTE_LEN => Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: MAX_NOTE_LEN,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Quantity Validation Flow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Operator enters quantity                                               │
/// │       │                                                                 │
/// │       ├── qty <= 0?  → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"      │
/// │       │                                                                 │
/// │       └── OK → line added                                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    non_negative("price", price)
}

/// Validates a manual discount entered by the cashier.
///
/// A discount larger than the subtotal is allowed; the total clamps at zero.
pub fn validate_discount(discount: Money) -> ValidationResult<()> {
    non_negative("discount", discount)
}

/// Validates the counted drawer balance at close.
pub fn validate_counted_balance(counted: Money) -> ValidationResult<()> {
    non_negative("counted balance", counted)
}

/// Validates a cash movement amount. Must be strictly positive.
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::validation::validate_cash_movement_amount;
///
/// assert!(validate_cash_movement_amount(Money::from_cents(2_000)).is_ok());
/// assert!(validate_cash_movement_amount(Money::zero()).is_err());
/// ```
pub fn validate_cash_movement_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

fn non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
