//! # Endpoint Groups
//!
//! One group per backend resource, handed out by [`ApiClient`].
//!
//! ## Endpoint Group Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command                                                                │
//! │       │                                                                 │
//! │       │  api.coupons().validate("SAVE10", order_total)                  │
//! │       ▼                                                                 │
//! │  CouponsApi                                                             │
//! │  └── validate(&self, code, order_total)                                 │
//! │       │                                                                 │
//! │       │  POST /coupons/validate                                         │
//! │       ▼                                                                 │
//! │  Backend                                                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Groups
//!
//! - [`CouponsApi`] - Coupon validation
//! - [`LoyaltyApi`] - Loyalty program config and customer balances
//! - [`SalesApi`] - Sale creation and completion
//! - [`RegisterApi`] - Register session, cash movements, close, Z-report
//!
//! [`ApiClient`]: crate::ApiClient

pub mod coupons;
pub mod loyalty;
pub mod register;
pub mod sales;

pub use coupons::CouponsApi;
pub use loyalty::LoyaltyApi;
pub use register::RegisterApi;
pub use sales::SalesApi;
