//! # tally-core: Pure Business Logic for Tally POS
//!
//! This crate is the **heart** of the Tally POS checkout. It contains the
//! sale total computation and register reconciliation as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tally-terminal (app)                         │   │
//! │  │    Cart ──► Checkout ──► Tender ──► Register close              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │  payment  │  │ register  │  │   cart    │  │   │
//! │  │   │ discounts │  │  tender   │  │ expected  │  │  lines    │  │   │
//! │  │   │ loyalty   │  │  split    │  │ vs counted│  │ subtotal  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-api (REST client)                      │   │
//! │  │        coupons, loyalty, sales, register endpoints              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart reducer (lines, quantities, subtotal)
//! - [`pricing`] - Discount composition into the final payable total
//! - [`payment`] - Tender resolution for cash, card, online, credit and split
//! - [`register`] - Drawer reconciliation and the close-register flow
//! - [`types`] - Domain types (loyalty, coupons, register sessions)
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::pricing::{compose, PriceInputs};
//!
//! let breakdown = compose(&PriceInputs {
//!     subtotal: Money::from_cents(10_000),
//!     manual_discount: Money::from_cents(500),
//!     coupon_discount: Money::from_cents(1_000),
//!     loyalty: None,
//! });
//!
//! assert_eq!(breakdown.final_total.cents(), 8_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod register;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::{ResolvedPayment, Tender};
pub use pricing::{LoyaltyRedemption, PriceBreakdown, PriceInputs};
pub use register::{
    CloseDecision, CloseState, Reconciliation, ReconciliationStatus, RegisterCloseFlow,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Customer record used for unregistered buyers.
///
/// The walk-in customer can buy with any tender except store credit.
pub const WALK_IN_CUSTOMER_ID: i64 = 1;

/// Largest difference still treated as "equal" when comparing money.
///
/// Amounts compare as equal only when they differ by strictly less than
/// this, so in whole cents the comparison is exact.
pub const MONEY_TOLERANCE: Money = Money::from_cents(1);

/// Maximum lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// Guards against typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;
