//! # Price Composition
//!
//! Turns a subtotal and its discounts into the amount the customer pays.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  subtotal (cart or pending sale)                                        │
//! │     − manual discount          (entered by the cashier)                 │
//! │     − coupon discount          (amount returned by /coupons/validate)   │
//! │     − loyalty discount         (min(requested, available) × rate)       │
//! │  ─────────────────────────                                              │
//! │  final total = max(0, …)                                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Coupon eligibility is decided by the backend; this module only consumes
//! the discount it returned. Every function here is pure: identical inputs
//! always give an identical breakdown.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LoyaltyAccount, PointRate};

// =============================================================================
// Loyalty Redemption
// =============================================================================

/// Points the cashier asked to redeem against a customer's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoyaltyRedemption {
    pub requested_points: i64,
    pub available_points: i64,
    pub rate: PointRate,
}

impl LoyaltyRedemption {
    /// Builds a redemption against an account snapshot.
    ///
    /// Rejects a redemption that, after capping, uses fewer points than the
    /// program minimum. Requesting zero points is always allowed.
    pub fn against(account: &LoyaltyAccount, requested_points: i64) -> CoreResult<Self> {
        let redemption = LoyaltyRedemption {
            requested_points,
            available_points: account.points,
            rate: account.point_rate,
        };

        let used = redemption.points_used();
        if used > 0 && used < account.min_redeem_points {
            return Err(CoreError::LoyaltyBelowMinimum {
                requested: used,
                minimum: account.min_redeem_points,
            });
        }

        Ok(redemption)
    }

    /// Points actually redeemed.
    pub fn points_used(&self) -> i64 {
        redeemable_points(self.requested_points, self.available_points)
    }

    /// Discount granted by the redeemed points.
    pub fn discount(&self) -> Money {
        self.rate.value_of(self.points_used())
    }
}

/// Caps a request at the available balance.
///
/// Negative requests count as zero.
///
/// ## Example
/// ```rust
/// use tally_core::pricing::redeemable_points;
///
/// assert_eq!(redeemable_points(150, 120), 120);
/// assert_eq!(redeemable_points(80, 120), 80);
/// assert_eq!(redeemable_points(-5, 120), 0);
/// ```
pub fn redeemable_points(requested: i64, available: i64) -> i64 {
    requested.max(0).min(available.max(0))
}

/// Points used and discount granted when redeeming `requested` points.
///
/// Enforces the account's minimum redemption.
pub fn loyalty_discount(requested: i64, account: &LoyaltyAccount) -> CoreResult<(i64, Money)> {
    let redemption = LoyaltyRedemption::against(account, requested)?;
    Ok((redemption.points_used(), redemption.discount()))
}

// =============================================================================
// Composer
// =============================================================================

/// Everything that feeds the final total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceInputs {
    pub subtotal: Money,
    pub manual_discount: Money,
    pub coupon_discount: Money,
    pub loyalty: Option<LoyaltyRedemption>,
}

/// Result of composing a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub manual_discount: Money,
    pub coupon_discount: Money,
    pub loyalty_points_used: i64,
    pub loyalty_discount: Money,
    pub final_total: Money,
}

impl PriceBreakdown {
    /// Sum of every discount component.
    pub fn total_discount(&self) -> Money {
        self.manual_discount + self.coupon_discount + self.loyalty_discount
    }
}

/// Composes the final payable total.
///
/// ```text
/// final_total = max(0, subtotal - manual - coupon - loyalty)
/// ```
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::pricing::{compose, LoyaltyRedemption, PriceInputs};
/// use tally_core::types::PointRate;
///
/// let breakdown = compose(&PriceInputs {
///     subtotal: Money::from_cents(5_000),
///     manual_discount: Money::zero(),
///     coupon_discount: Money::from_cents(1_000),
///     loyalty: Some(LoyaltyRedemption {
///         requested_points: 150,
///         available_points: 120,
///         rate: PointRate::from_decimal(0.10),
///     }),
/// });
///
/// assert_eq!(breakdown.loyalty_discount.cents(), 1_200);
/// assert_eq!(breakdown.final_total.cents(), 2_800);
/// ```
pub fn compose(inputs: &PriceInputs) -> PriceBreakdown {
    let (loyalty_points_used, loyalty_discount) = match inputs.loyalty {
        Some(redemption) => (redemption.points_used(), redemption.discount()),
        None => (0, Money::zero()),
    };

    let final_total = (inputs.subtotal
        - inputs.manual_discount
        - inputs.coupon_discount
        - loyalty_discount)
        .non_negative();

    PriceBreakdown {
        subtotal: inputs.subtotal,
        manual_discount: inputs.manual_discount,
        coupon_discount: inputs.coupon_discount,
        loyalty_points_used,
        loyalty_discount,
        final_total,
    }
}
