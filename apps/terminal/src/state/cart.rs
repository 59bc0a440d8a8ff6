//! # Cart State
//!
//! Holds the cart being rung up.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>`: checkout commands read it to
//! price the sale and clear it once the backend accepts the sale, and only
//! one of them may touch it at a time.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Source                   Entry Point             Cart State Change     │
//! │  ──────                   ───────────             ─────────────────     │
//! │                                                                         │
//! │  cart.json ──────────────► load_cart_file() ─────► Cart::from_lines     │
//! │                                                                         │
//! │  quote / apply_coupon ───► with_cart() ──────────► (read only)          │
//! │                                                                         │
//! │  submit_sale succeeded ──► with_cart_mut() ──────► cart.clear()         │
//! │                                                                         │
//! │  submit_sale failed ─────► (untouched) ──────────► operator retries     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tally_core::{Cart, CartLine, Money};

use crate::error::{CommandError, CommandResult};

/// One line of a cart file.
///
/// Prices are written the way an operator reads them (`12.50`), not in
/// cents.
#[derive(Debug, Clone, Deserialize)]
pub struct CartFileLine {
    pub product_id: i64,
    #[serde(default)]
    pub variant_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub quantity: i64,
    #[serde(with = "tally_core::money::dollars")]
    pub unit_price: Money,
}

/// Parses a JSON array of cart lines into a validated cart.
pub fn parse_cart(json: &str) -> CommandResult<Cart> {
    let lines: Vec<CartFileLine> = serde_json::from_str(json)
        .map_err(|e| CommandError::validation(format!("Invalid cart file: {}", e)))?;

    let lines = lines
        .into_iter()
        .map(|l| CartLine::new(l.product_id, l.variant_id, l.name, l.quantity, l.unit_price))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Cart::from_lines(lines)?)
}

/// Reads and parses a cart file.
pub fn load_cart_file(path: &Path) -> CommandResult<Cart> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        CommandError::validation(format!("Cannot read cart file {}: {}", path.display(), e))
    })?;
    parse_cart(&json)
}

/// Cart totals summary for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Shared cart state.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Wraps an existing cart.
    pub fn with_contents(cart: Cart) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(cart)),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let subtotal = cart_state.with_cart(|cart| cart.subtotal());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut cart)
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart))
    }
}
