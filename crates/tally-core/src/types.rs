//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ LoyaltyAccount  │   │  AppliedCoupon  │   │ RegisterSession │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  points         │   │  code           │   │  opening        │       │
//! │  │  point_rate     │   │  discount       │   │  cash sales     │       │
//! │  │  min_redeem     │   └─────────────────┘   │  cash in / out  │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PointRate     │   │ PaymentMethod   │   │CashMovementKind │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │ micros/point    │   │  Cash  Card     │   │  In             │       │
//! │  │ 100_000 = $0.10 │   │  Online Credit  │   │  Out            │       │
//! │  └─────────────────┘   │  Split          │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All of these are read-only snapshots of backend state. The backend owns
//! persistence; the client never mutates them after fetching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Point Rate
// =============================================================================

/// Value of one loyalty point, in millionths of a currency unit.
///
/// ## Why Micros?
/// Point values are often fractions of a cent (0.5¢ per point). Storing
/// micros keeps redemption exact: 100_000 micros = $0.10 per point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PointRate(i64);

impl PointRate {
    /// Creates a rate from the backend's decimal `amount_per_point`.
    pub fn from_decimal(amount_per_point: f64) -> Self {
        PointRate((amount_per_point * 1_000_000.0).round() as i64)
    }

    /// Returns the rate in micros per point.
    #[inline]
    pub const fn micros(&self) -> i64 {
        self.0
    }

    /// Returns the rate as a decimal amount per point (for the wire only).
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Value of `points` points, rounded to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::types::PointRate;
    ///
    /// let rate = PointRate::from_decimal(0.10);
    /// assert_eq!(rate.value_of(120).cents(), 1200);
    /// ```
    pub fn value_of(&self, points: i64) -> Money {
        // i128 keeps large balances from overflowing
        let cents = (points as i128 * self.0 as i128 + 5_000) / 10_000;
        Money::from_cents(cents as i64)
    }
}

impl Default for PointRate {
    fn default() -> Self {
        PointRate(0)
    }
}

// =============================================================================
// Loyalty
// =============================================================================

/// Loyalty snapshot for one customer, taken when checkout opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoyaltyAccount {
    /// Customer this balance belongs to.
    pub customer_id: i64,

    /// Points currently available.
    pub points: i64,

    /// Value of a single point.
    pub point_rate: PointRate,

    /// Smallest redemption the program accepts.
    pub min_redeem_points: i64,
}

impl LoyaltyAccount {
    /// Most points this customer could redeem right now.
    pub fn max_redeemable_points(&self) -> i64 {
        self.points.max(0)
    }

    /// Value of the whole balance.
    pub fn balance_value(&self) -> Money {
        self.point_rate.value_of(self.max_redeemable_points())
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A coupon the backend accepted for the current order total.
///
/// Eligibility is decided server-side; only the returned discount is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount: Money,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Card on an external terminal.
    Card,
    /// Bank transfer, wallet or payment link.
    Online,
    /// Store credit, settled later by a named customer.
    Credit,
    /// Part cash, part card.
    Split,
}

impl PaymentMethod {
    /// Returns the wire name of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Online => "online",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Split => "split",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "debit" => Ok(PaymentMethod::Card),
            "online" | "transfer" => Ok(PaymentMethod::Online),
            "credit" => Ok(PaymentMethod::Credit),
            "split" => Ok(PaymentMethod::Split),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: ["cash", "card", "online", "credit", "split"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Register Session
// =============================================================================

/// A cashier's open register shift, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterSession {
    pub id: i64,
    pub opening_balance: Money,
    pub cash_sales_total: Money,
    pub card_sales_total: Money,
    pub total_cash_in: Money,
    pub total_cash_out: Money,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    pub cashier_name: Option<String>,
}

// =============================================================================
// Cash Movement
// =============================================================================

/// Direction of a cash movement during a register session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CashMovementKind {
    /// Cash added to the drawer (float top-up).
    In,
    /// Cash taken out of the drawer (payouts, bank drops).
    Out,
}

impl fmt::Display for CashMovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashMovementKind::In => f.write_str("in"),
            CashMovementKind::Out => f.write_str("out"),
        }
    }
}

impl FromStr for CashMovementKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" | "cash_in" => Ok(CashMovementKind::In),
            "out" | "cash_out" => Ok(CashMovementKind::Out),
            _ => Err(ValidationError::NotAllowed {
                field: "movement type".to_string(),
                allowed: vec!["in".to_string(), "out".to_string()],
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
