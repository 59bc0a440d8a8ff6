//! # Terminal Commands
//!
//! Each command takes the state it needs as explicit arguments and returns
//! a `CommandResult`.
//!
//! ## Command Categories
//! - **Checkout**: customer, discounts, coupon, loyalty, quote, sale
//! - **Register**: session status, cash movements, close, Z-report
//!
//! Commands that only compute (`quote`, `redeem_points`) never touch the
//! network. Commands that do call the backend run every local check first.

pub mod checkout;
pub mod register;

pub use checkout::{
    apply_coupon, complete_pending_sale, load_loyalty, quote, redeem_points, remove_coupon,
    select_customer, set_manual_discount, submit_sale, PendingPayment, SaleReceipt,
};
pub use register::{
    begin_close, confirm_close, load_session, recount, record_cash_movement, submit_close,
    z_report, CloseOutcome, RegisterStatus,
};
