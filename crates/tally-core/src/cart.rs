//! # Cart
//!
//! The cart being rung up. Owned transiently by the checkout flow and
//! cleared once the sale is accepted by the backend.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Mutation Entry Points                           │
//! │                                                                         │
//! │  Operator Action          Method                   Change               │
//! │  ───────────────          ──────                   ──────               │
//! │                                                                         │
//! │  Scan / pick product ───► add_line() ────────────► push or qty += n    │
//! │                                                                         │
//! │  Change quantity ───────► set_quantity() ────────► qty = n (0 removes) │
//! │                                                                         │
//! │  Remove line ───────────► remove_line() ─────────► line dropped        │
//! │                                                                         │
//! │  Sale accepted ─────────► clear() ───────────────► lines emptied       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There are no other ways to mutate a cart, so the reducer can be tested
//! in isolation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_price, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// One line of the cart.
///
/// Lines are unique by `(product_id, variant_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: i64,
    pub variant_id: Option<i64>,
    /// Display name at the time the line was added.
    pub name: String,
    pub quantity: i64,
    /// Unit price frozen when the line was added.
    pub unit_price: Money,
}

impl CartLine {
    /// Creates a line after validating quantity and price.
    pub fn new(
        product_id: i64,
        variant_id: Option<i64>,
        name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> CoreResult<Self> {
        validate_quantity(quantity)?;
        validate_price(unit_price)?;
        Ok(CartLine {
            product_id,
            variant_id,
            name: name.into(),
            quantity,
            unit_price,
        })
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    fn matches(&self, product_id: i64, variant_id: Option<i64>) -> bool {
        self.product_id == product_id && self.variant_id == variant_id
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `(product_id, variant_id)`
/// - Quantity is 1..=999 on every line
/// - At most 100 lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Builds a cart from a list of lines, merging duplicates.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> CoreResult<Self> {
        let mut cart = Cart::new();
        for line in lines {
            cart.add_line(line)?;
        }
        Ok(cart)
    }

    /// Adds a line, or increases the quantity of a matching line.
    ///
    /// The price of an existing line is kept; the new line's price is
    /// ignored when merging.
    pub fn add_line(&mut self, line: CartLine) -> CoreResult<()> {
        validate_quantity(line.quantity)?;
        validate_price(line.unit_price)?;

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.matches(line.product_id, line.variant_id))
        {
            let new_qty = existing.quantity + line.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(line);
        Ok(())
    }

    /// Sets the quantity of a line. A quantity of 0 removes it.
    pub fn set_quantity(
        &mut self,
        product_id: i64,
        variant_id: Option<i64>,
        quantity: i64,
    ) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_line(product_id, variant_id);
        }
        validate_quantity(quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.matches(product_id, variant_id))
            .ok_or(CoreError::LineNotFound {
                product_id,
                variant_id,
            })?;
        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line.
    pub fn remove_line(&mut self, product_id: i64, variant_id: Option<i64>) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| !l.matches(product_id, variant_id));
        if self.lines.len() == before {
            return Err(CoreError::LineNotFound {
                product_id,
                variant_id,
            });
        }
        Ok(())
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of line totals, before any discount.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
