//! # Checkout State
//!
//! Everything about the sale in progress that is not a cart line: the
//! selected customer, discounts and the loyalty snapshot.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Checkout                                                               │
//! │    customer_id        (default customer until one is selected)         │
//! │    manual_discount    ──┐                                               │
//! │    coupon             ──┼──► PriceInputs ──► compose() ──► total        │
//! │    loyalty + points   ──┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Selecting a different customer drops the loyalty snapshot, since it
//! belongs to the previous customer.

use std::sync::{Arc, Mutex};

use tally_core::{AppliedCoupon, LoyaltyAccount, Money, WALK_IN_CUSTOMER_ID};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub customer_id: i64,
    pub manual_discount: Money,
    pub coupon: Option<AppliedCoupon>,
    pub loyalty: Option<LoyaltyAccount>,
    pub points_requested: i64,
    default_customer_id: i64,
}

impl Checkout {
    pub fn new(default_customer_id: i64) -> Self {
        Checkout {
            customer_id: default_customer_id,
            manual_discount: Money::zero(),
            coupon: None,
            loyalty: None,
            points_requested: 0,
            default_customer_id,
        }
    }

    /// Switches customer; a loyalty snapshot for someone else is dropped.
    pub fn select_customer(&mut self, customer_id: i64) {
        if customer_id != self.customer_id {
            self.loyalty = None;
            self.points_requested = 0;
        }
        self.customer_id = customer_id;
    }

    /// Returns to a fresh checkout for the default customer.
    pub fn reset(&mut self) {
        *self = Checkout::new(self.default_customer_id);
    }

    pub fn is_walk_in(&self) -> bool {
        self.customer_id == WALK_IN_CUSTOMER_ID
    }
}

impl Default for Checkout {
    fn default() -> Self {
        Checkout::new(WALK_IN_CUSTOMER_ID)
    }
}

/// Shared checkout state.
#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    checkout: Arc<Mutex<Checkout>>,
}

impl CheckoutState {
    pub fn new(default_customer_id: i64) -> Self {
        CheckoutState {
            checkout: Arc::new(Mutex::new(Checkout::new(default_customer_id))),
        }
    }

    pub fn with_checkout<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Checkout) -> R,
    {
        let checkout = self.checkout.lock().unwrap_or_else(|e| e.into_inner());
        f(&checkout)
    }

    pub fn with_checkout_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Checkout) -> R,
    {
        let mut checkout = self.checkout.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut checkout)
    }

    pub fn snapshot(&self) -> Checkout {
        self.with_checkout(Checkout::clone)
    }
}
