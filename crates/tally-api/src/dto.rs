//! # Wire Types
//!
//! Request and response bodies, one struct per endpoint payload.
//!
//! Amounts travel as decimal dollars and are converted to [`Money`] at
//! this boundary only. Response types are lenient: optional fields default
//! so that extra or missing backend fields do not fail a checkout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use tally_core::money::{dollars, Money};
use tally_core::{CashMovementKind, PaymentMethod, PointRate, RegisterSession};

/// Accepts `0.1` or `"0.10"` for decimal fields that are not money.
fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Decimal::deserialize(deserializer)? {
        Decimal::Number(n) => Ok(n),
        Decimal::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Coupons
// =============================================================================

/// `POST /coupons/validate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidateCouponRequest {
    pub code: String,
    #[serde(with = "dollars")]
    pub order_total: Money,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CouponValidation {
    /// Some backends answer 200 with `valid: false` instead of an error.
    #[serde(default = "default_true")]
    pub valid: bool,
    /// Missing on some backends; the endpoint applies $0.00 and warns.
    #[serde(default, with = "dollars::option")]
    pub discount_amount: Option<Money>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Loyalty
// =============================================================================

/// `GET /loyalty/config`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoyaltyConfig {
    #[serde(deserialize_with = "decimal")]
    pub amount_per_point: f64,
    #[serde(default)]
    pub min_redeem_points: i64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl LoyaltyConfig {
    pub fn point_rate(&self) -> PointRate {
        PointRate::from_decimal(self.amount_per_point)
    }
}

/// `GET /loyalty/customer/:id`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerLoyalty {
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(alias = "loyalty_points")]
    pub points: i64,
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleItemPayload {
    pub product_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<i64>,
    pub quantity: i64,
    #[serde(with = "dollars")]
    pub unit_price: Money,
}

/// `POST /sales`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSaleRequest {
    pub items: Vec<SaleItemPayload>,
    pub customer_id: i64,
    #[serde(with = "dollars")]
    pub discount: Money,
    pub coupon_code: Option<String>,
    #[serde(with = "dollars")]
    pub coupon_discount: Money,
    pub loyalty_points_used: i64,
    #[serde(with = "dollars")]
    pub loyalty_discount: Money,
    #[serde(with = "dollars")]
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    #[serde(with = "dollars")]
    pub amount_paid: Money,
    #[serde(with = "dollars")]
    pub change_due: Money,
    #[serde(with = "dollars::option")]
    pub cash_amount: Option<Money>,
    #[serde(with = "dollars::option")]
    pub card_amount: Option<Money>,
    pub due_date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// `PUT /sales/:id/complete`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteSaleRequest {
    pub payment_method: PaymentMethod,
    #[serde(with = "dollars")]
    pub amount_paid: Money,
    pub note: Option<String>,
}

/// A sale as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Absent when the backend acknowledges without echoing the sale.
    #[serde(default, alias = "sale_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, with = "dollars")]
    pub total_amount: Money,
    #[serde(default, with = "dollars::option")]
    pub amount_paid: Option<Money>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl SaleRecord {
    /// Record for a sale the backend accepted without a readable body.
    pub fn acknowledged(id: Option<i64>, total_amount: Money) -> Self {
        SaleRecord {
            id,
            invoice_number: None,
            status: None,
            total_amount,
            amount_paid: None,
            payment_method: None,
        }
    }

    /// Invoice number, else `#id`, else a plain marker.
    pub fn label(&self) -> String {
        match (&self.invoice_number, self.id) {
            (Some(invoice), _) => invoice.clone(),
            (None, Some(id)) => format!("#{}", id),
            (None, None) => "(recorded)".to_string(),
        }
    }
}

// =============================================================================
// Register
// =============================================================================

/// `GET /register/current`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterSessionPayload {
    pub id: i64,
    #[serde(with = "dollars")]
    pub opening_balance: Money,
    #[serde(default, with = "dollars")]
    pub cash_sales_total: Money,
    #[serde(default, with = "dollars")]
    pub card_sales_total: Money,
    #[serde(default, with = "dollars")]
    pub total_cash_in: Money,
    #[serde(default, with = "dollars")]
    pub total_cash_out: Money,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub cashier_name: Option<String>,
}

impl From<RegisterSessionPayload> for RegisterSession {
    fn from(p: RegisterSessionPayload) -> Self {
        RegisterSession {
            id: p.id,
            opening_balance: p.opening_balance,
            cash_sales_total: p.cash_sales_total,
            card_sales_total: p.card_sales_total,
            total_cash_in: p.total_cash_in,
            total_cash_out: p.total_cash_out,
            opened_at: p.opened_at,
            cashier_name: p.cashier_name,
        }
    }
}

/// `POST /register/cash-movement`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashMovementRequest {
    #[serde(rename = "type")]
    pub kind: CashMovementKind,
    #[serde(with = "dollars")]
    pub amount: Money,
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashMovementRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: CashMovementKind,
    #[serde(with = "dollars")]
    pub amount: Money,
    #[serde(default)]
    pub reason: Option<String>,
}

/// `POST /register/close`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseRegisterRequest {
    #[serde(with = "dollars")]
    pub closing_balance: Money,
    pub close_note: Option<String>,
    #[serde(with = "dollars")]
    pub expected_cash: Money,
    #[serde(with = "dollars")]
    pub difference: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedRegister {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, with = "dollars::option")]
    pub closing_balance: Option<Money>,
}

/// `GET /register/z-report`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZReport {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub transaction_count: i64,
    #[serde(default, with = "dollars")]
    pub total_sales: Money,
    #[serde(default, with = "dollars")]
    pub cash_total: Money,
    #[serde(default, with = "dollars")]
    pub card_total: Money,
    #[serde(default, with = "dollars")]
    pub online_total: Money,
    #[serde(default, with = "dollars")]
    pub credit_total: Money,
    #[serde(default, with = "dollars")]
    pub refunds_total: Money,
}
