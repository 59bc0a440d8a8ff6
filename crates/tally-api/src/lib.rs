//! # tally-api: REST Client for Tally POS
//!
//! Typed access to the backend the terminal talks to.
//!
//! ## Module Organization
//! ```text
//! tally_api/
//! ├── lib.rs            ◄─── You are here (exports)
//! ├── client.rs         ◄─── ApiClient: base URL, auth, send/decode
//! ├── config.rs         ◄─── ApiConfig: [api] section + env overrides
//! ├── dto.rs            ◄─── Request/response bodies per endpoint
//! ├── error.rs          ◄─── ApiClientError + operator-facing messages
//! ├── endpoints/
//! │   ├── coupons.rs    ◄─── POST /coupons/validate
//! │   ├── loyalty.rs    ◄─── GET /loyalty/config, /loyalty/customer/:id
//! │   ├── sales.rs      ◄─── POST /sales, PUT /sales/:id/complete
//! │   └── register.rs   ◄─── /register/current, cash-movement, close, z-report
//! └── test_support.rs   ◄─── In-process mock backend (tests / test-util)
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use tally_api::{ApiClient, ApiConfig};
//! use tally_core::Money;
//!
//! # async fn demo() -> tally_api::ApiResult<()> {
//! let api = ApiClient::new(&ApiConfig::default())?;
//! let coupon = api.coupons().validate("SAVE10", Money::from_cents(9_500)).await?;
//! println!("{} off", coupon.discount);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dto;
pub mod endpoints;
pub mod error;

#[cfg(any(test, feature = "test-util"))]
pub mod test_support;

pub use client::ApiClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use error::{ApiClientError, ApiResult, GENERIC_FAILURE_MESSAGE};
