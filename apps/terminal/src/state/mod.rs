//! # State Module
//!
//! Separate state types instead of one big `AppState`, so each command
//! declares exactly what it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  CartState   │  │CheckoutState │  │  TerminalConfig  │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<  │  │  [api] [store]   │              │
//! │  │    Cart      │  │   Checkout   │  │  [checkout]      │              │
//! │  │  >>          │  │  >>          │  │                  │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  • CartState / CheckoutState: exclusive access through closures        │
//! │  • TerminalConfig: read-only after startup                             │
//! │  • RegisterCloseFlow (tally-core) is owned by the close command          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod checkout;
mod config;

pub use cart::{load_cart_file, parse_cart, CartFileLine, CartState, CartTotals};
pub use checkout::{Checkout, CheckoutState};
pub use config::{
    default_config_path, CheckoutConfig, ConfigError, ConfigResult, StoreConfig, TerminalConfig,
    CONFIG_FILE_NAME,
};
