//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Split tender in floating point:                                        │
//! │    60.01 + 39.99 = 100.00000000000001  ❌ not equal to 100.00           │
//! │                                                                         │
//! │  Drawer count in floating point:                                        │
//! │    100 + 250 + 50 - 30 - 369.99 = 0.009999999999990905                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    6001 + 3999 = 10000 cents, exactly                                   │
//! │    Floats only exist at the JSON boundary (see [`dollars`])             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let doubled = price * 2;            // $21.98
//! let total = price + Money::from_cents(500); // $15.99
//!
//! // User input is parsed as a decimal string, never through f64
//! let counted: Money = "365.00".parse().unwrap();
//! assert_eq!(counted.cents(), 36_500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: drawer differences and change can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde as cents**: internal payloads carry cents; the backend's
///   decimal numbers go through [`dollars`]
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  CartLine.unit_price ──► Cart.subtotal ──► PriceComposer ──► total      │
/// │                                                                         │
/// │  total ──► PaymentSplitResolver ──► amount_paid / change / credit       │
/// │                                                                         │
/// │  RegisterSession ──► RegisterReconciler ──► expected / difference       │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount received from the backend into cents.
    ///
    /// Rounds to the nearest cent, half away from zero. This is the only
    /// place a float becomes `Money`; it exists because the REST API speaks
    /// JSON numbers.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(39.99).cents(), 3999);
    /// assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Converts the value into a decimal amount for the backend.
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).dollars(), 10);
    /// assert_eq!(Money::from_cents(-550).dollars(), -5);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-250).non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(250).non_negative().cents(), 250);
    /// ```
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns true when `self` and `other` differ by less than `tolerance`.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::MONEY_TOLERANCE;
    ///
    /// let total = Money::from_cents(10_000);
    /// assert!(total.is_within(Money::from_cents(10_000), MONEY_TOLERANCE));
    /// assert!(!total.is_within(Money::from_cents(9_999), MONEY_TOLERANCE));
    /// ```
    #[inline]
    pub const fn is_within(&self, other: Money, tolerance: Money) -> bool {
        (self.0 - other.0).abs() < tolerance.0
    }

    /// Formats the amount with a currency symbol and a number of decimals.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(123_456).format_with("Rs ", 2), "Rs 1234.56");
    /// assert_eq!(Money::from_cents(-500).format_with("€", 2), "-€5.00");
    /// ```
    pub fn format_with(&self, symbol: &str, decimals: u8) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        match decimals {
            0 => format!("{}{}{}", sign, symbol, (cents + 50) / 100),
            1 => format!("{}{}{}.{}", sign, symbol, cents / 100, (cents % 100) / 10),
            _ => format!(
                "{}{}{}.{:02}{}",
                sign,
                symbol,
                cents / 100,
                cents % 100,
                "0".repeat(decimals as usize - 2)
            ),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses user-entered amounts such as `"365"`, `"39.99"` or `"-5.5"`.
///
/// At most two decimal places are accepted. No floating point is involved.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim().trim_start_matches('$');
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must be a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must be a number"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("must be a number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("must be a number"))?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money in a human-readable format.
///
/// ## Note
/// For the configured store currency use [`Money::format_with`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serde adapter for the backend's decimal amounts.
///
/// Use with `#[serde(with = "tally_core::money::dollars")]`. Serializes as a
/// JSON number of dollars (`12.5`) and accepts either a number or a numeric
/// string (`"12.50"`) on the way in, since the backend returns both.
pub mod dollars {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        match Amount::deserialize(deserializer)? {
            Amount::Number(n) => Ok(Money::from_decimal(n)),
            Amount::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }

    /// Same as the parent module for `Option<Money>`; `null` maps to `None`.
    pub mod option {
        use super::{Amount, Money};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(m) => serializer.serialize_some(&m.to_decimal()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            match Option::<Amount>::deserialize(deserializer)? {
                None => Ok(None),
                Some(Amount::Number(n)) => Ok(Some(Money::from_decimal(n))),
                Some(Amount::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_from_decimal_rounds_float_noise() {
        assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_decimal(60.01).cents(), 6001);
        assert_eq!(Money::from_decimal(-5.0).cents(), -500);
        assert_eq!(Money::from_decimal(12.345).cents(), 1235);
    }

    #[test]
    fn test_parse_amounts() {
        assert_eq!("365".parse::<Money>().unwrap().cents(), 36_500);
        assert_eq!("39.99".parse::<Money>().unwrap().cents(), 3_999);
        assert_eq!("0.5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!(".75".parse::<Money>().unwrap().cents(), 75);
        assert_eq!("-5.5".parse::<Money>().unwrap().cents(), -550);
        assert_eq!("$12.00".parse::<Money>().unwrap().cents(), 1_200);

        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn test_is_within_tolerance_is_strict() {
        let total = Money::from_cents(10_000);
        assert!(total.is_within(Money::from_cents(10_000), Money::from_cents(1)));
        assert!(!total.is_within(Money::from_cents(9_999), Money::from_cents(1)));
        assert!(total.is_within(Money::from_cents(9_999), Money::from_cents(2)));
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(Money::from_cents(-1).non_negative(), Money::zero());
        assert_eq!(Money::from_cents(0).non_negative(), Money::zero());
        assert_eq!(Money::from_cents(7).non_negative().cents(), 7);
    }

    #[test]
    fn test_format_with() {
        assert_eq!(Money::from_cents(1234).format_with("$", 2), "$12.34");
        assert_eq!(Money::from_cents(1).format_with("$", 2), "$0.01");
        assert_eq!(Money::from_cents(-1234).format_with("$", 2), "-$12.34");
        assert_eq!(Money::from_cents(1250).format_with("¥", 0), "¥13");
        assert_eq!(Money::from_cents(1234).format_with("", 3), "12.340");
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wire {
        #[serde(with = "dollars")]
        total: Money,
        #[serde(default, with = "dollars::option")]
        paid: Option<Money>,
    }

    #[test]
    fn test_dollars_wire_format() {
        let wire = Wire {
            total: Money::from_cents(1250),
            paid: None,
        };
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["total"], serde_json::json!(12.5));
        assert!(json["paid"].is_null());

        let parsed: Wire = serde_json::from_str(r#"{"total": "99.99", "paid": 100}"#).unwrap();
        assert_eq!(parsed.total.cents(), 9_999);
        assert_eq!(parsed.paid, Some(Money::from_cents(10_000)));

        let missing: Wire = serde_json::from_str(r#"{"total": 1}"#).unwrap();
        assert_eq!(missing.paid, None);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
