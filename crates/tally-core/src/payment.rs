//! # Payment Resolution
//!
//! Checks a tender against the payable total and works out what the sale
//! records: amount paid, change due and outstanding credit.
//!
//! ## Rules per Method
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cash / card / online                                                   │
//! │    amount_paid defaults to the total                                    │
//! │    change_due = max(0, amount_paid - total)                             │
//! │    amount_paid < total ──► InsufficientTender                           │
//! │                                                                         │
//! │  split                                                                  │
//! │    cash + card must equal the total (difference < $0.01)                │
//! │    otherwise ──► SplitMismatch                                          │
//! │                                                                         │
//! │  credit                                                                 │
//! │    walk-in customer ──► CreditRequiresNamedCustomer                     │
//! │    no due date      ──► MissingDueDate                                  │
//! │    due date < today ──► DueDateInPast                                   │
//! │    amount_paid = 0, outstanding = total                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected tender never reaches the network: the caller gets the error
//! and the sale is not submitted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::PaymentMethod;
use crate::{MONEY_TOLERANCE, WALK_IN_CUSTOMER_ID};

/// What the customer hands over.
///
/// `None` amounts mean "exact amount".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Tender {
    Cash {
        tendered: Option<Money>,
    },
    Card {
        amount: Option<Money>,
    },
    Online {
        amount: Option<Money>,
    },
    Split {
        cash: Money,
        card: Money,
    },
    Credit {
        #[ts(as = "Option<String>")]
        due_date: Option<NaiveDate>,
    },
}

impl Tender {
    /// Payment method recorded for this tender.
    pub fn method(&self) -> PaymentMethod {
        match self {
            Tender::Cash { .. } => PaymentMethod::Cash,
            Tender::Card { .. } => PaymentMethod::Card,
            Tender::Online { .. } => PaymentMethod::Online,
            Tender::Split { .. } => PaymentMethod::Split,
            Tender::Credit { .. } => PaymentMethod::Credit,
        }
    }
}

/// A tender that passed every local check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResolvedPayment {
    pub method: PaymentMethod,
    pub total: Money,
    pub amount_paid: Money,
    pub change_due: Money,
    /// Amount left on the customer's account (credit sales).
    pub outstanding: Money,
    pub cash_portion: Option<Money>,
    pub card_portion: Option<Money>,
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
}

impl ResolvedPayment {
    fn paid_in_full(method: PaymentMethod, total: Money, paid: Money) -> Self {
        ResolvedPayment {
            method,
            total,
            amount_paid: paid,
            change_due: (paid - total).non_negative(),
            outstanding: Money::zero(),
            cash_portion: None,
            card_portion: None,
            due_date: None,
        }
    }
}

/// Resolves `tender` against `total` for `customer_id`.
///
/// `today` is supplied by the caller so this stays a pure function.
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::payment::{resolve, Tender};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let total = Money::from_cents(10_000);
///
/// let split = Tender::Split { cash: Money::from_cents(6_000), card: Money::from_cents(3_999) };
/// assert!(resolve(total, &split, 1, today).is_err());
///
/// let split = Tender::Split { cash: Money::from_cents(6_001), card: Money::from_cents(3_999) };
/// assert!(resolve(total, &split, 1, today).is_ok());
/// ```
pub fn resolve(
    total: Money,
    tender: &Tender,
    customer_id: i64,
    today: NaiveDate,
) -> CoreResult<ResolvedPayment> {
    let method = tender.method();

    match *tender {
        Tender::Cash { tendered: amount }
        | Tender::Card { amount }
        | Tender::Online { amount } => {
            let paid = amount.unwrap_or(total);
            if paid.is_negative() {
                return Err(ValidationError::MustNotBeNegative {
                    field: "amount paid".to_string(),
                }
                .into());
            }
            if paid < total {
                return Err(CoreError::InsufficientTender {
                    tendered: paid,
                    total,
                });
            }
            Ok(ResolvedPayment::paid_in_full(method, total, paid))
        }

        Tender::Split { cash, card } => {
            if cash.is_negative() || card.is_negative() {
                return Err(ValidationError::MustNotBeNegative {
                    field: "split amount".to_string(),
                }
                .into());
            }
            let entered = cash + card;
            if !entered.is_within(total, MONEY_TOLERANCE) {
                return Err(CoreError::SplitMismatch {
                    cash,
                    card,
                    entered,
                    total,
                });
            }
            Ok(ResolvedPayment {
                cash_portion: Some(cash),
                card_portion: Some(card),
                ..ResolvedPayment::paid_in_full(method, total, entered)
            })
        }

        Tender::Credit { due_date } => {
            if customer_id == WALK_IN_CUSTOMER_ID {
                return Err(CoreError::CreditRequiresNamedCustomer);
            }
            let due_date = due_date.ok_or(CoreError::MissingDueDate)?;
            if due_date < today {
                return Err(CoreError::DueDateInPast { due_date, today });
            }
            Ok(ResolvedPayment {
                method,
                total,
                amount_paid: Money::zero(),
                change_due: Money::zero(),
                outstanding: total,
                cash_portion: None,
                card_portion: None,
                due_date: Some(due_date),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_cash_defaults_to_exact_amount() {
        let p = resolve(cents(4_250), &Tender::Cash { tendered: None }, 1, today()).unwrap();
        assert_eq!(p.method, PaymentMethod::Cash);
        assert_eq!(p.amount_paid.cents(), 4_250);
        assert_eq!(p.change_due, Money::zero());
        assert_eq!(p.outstanding, Money::zero());
    }

    #[test]
    fn test_cash_change_due() {
        let tender = Tender::Cash {
            tendered: Some(cents(5_000)),
        };
        let p = resolve(cents(4_250), &tender, 1, today()).unwrap();
        assert_eq!(p.amount_paid.cents(), 5_000);
        assert_eq!(p.change_due.cents(), 750);
    }

    #[test]
    fn test_cash_underpayment_rejected() {
        let tender = Tender::Cash {
            tendered: Some(cents(4_000)),
        };
        let err = resolve(cents(4_250), &tender, 1, today()).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientTender { .. }));
    }

    #[test]
    fn test_card_and_online_default_to_total() {
        let card = resolve(cents(999), &Tender::Card { amount: None }, 1, today()).unwrap();
        assert_eq!(card.method, PaymentMethod::Card);
        assert_eq!(card.amount_paid.cents(), 999);

        let online = resolve(cents(999), &Tender::Online { amount: None }, 1, today()).unwrap();
        assert_eq!(online.method, PaymentMethod::Online);
        assert_eq!(online.change_due, Money::zero());
    }

    #[test]
    fn test_split_off_by_a_cent_rejected() {
        let tender = Tender::Split {
            cash: cents(6_000),
            card: cents(3_999),
        };
        let err = resolve(cents(10_000), &tender, 1, today()).unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }

    #[test]
    fn test_split_exact_accepted() {
        let tender = Tender::Split {
            cash: cents(6_001),
            card: cents(3_999),
        };
        let p = resolve(cents(10_000), &tender, 1, today()).unwrap();
        assert_eq!(p.method, PaymentMethod::Split);
        assert_eq!(p.amount_paid.cents(), 10_000);
        assert_eq!(p.cash_portion, Some(cents(6_001)));
        assert_eq!(p.card_portion, Some(cents(3_999)));
        assert_eq!(p.change_due, Money::zero());
    }

    #[test]
    fn test_split_overpaid_rejected() {
        let tender = Tender::Split {
            cash: cents(6_000),
            card: cents(5_000),
        };
        assert!(resolve(cents(10_000), &tender, 1, today()).is_err());
    }

    #[test]
    fn test_split_negative_part_rejected() {
        let tender = Tender::Split {
            cash: cents(-500),
            card: cents(10_500),
        };
        let err = resolve(cents(10_000), &tender, 1, today()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_credit_walk_in_rejected_regardless_of_due_date() {
        for due in [None, Some(today()), NaiveDate::from_ymd_opt(2030, 1, 1)] {
            let err = resolve(
                cents(10_000),
                &Tender::Credit { due_date: due },
                WALK_IN_CUSTOMER_ID,
                today(),
            )
            .unwrap_err();
            assert!(matches!(err, CoreError::CreditRequiresNamedCustomer));
        }
    }

    #[test]
    fn test_credit_requires_due_date() {
        let err = resolve(cents(10_000), &Tender::Credit { due_date: None }, 7, today())
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingDueDate));
    }

    #[test]
    fn test_credit_due_date_in_past_rejected() {
        let yesterday = today().pred_opt().unwrap();
        let err = resolve(
            cents(10_000),
            &Tender::Credit {
                due_date: Some(yesterday),
            },
            7,
            today(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::DueDateInPast { .. }));
    }

    #[test]
    fn test_credit_records_outstanding_amount() {
        let p = resolve(
            cents(10_000),
            &Tender::Credit {
                due_date: Some(today()),
            },
            7,
            today(),
        )
        .unwrap();
        assert_eq!(p.method, PaymentMethod::Credit);
        assert_eq!(p.amount_paid, Money::zero());
        assert_eq!(p.outstanding.cents(), 10_000);
        assert_eq!(p.due_date, Some(today()));
    }

    #[test]
    fn test_zero_total_cash() {
        let p = resolve(Money::zero(), &Tender::Cash { tendered: None }, 1, today()).unwrap();
        assert_eq!(p.amount_paid, Money::zero());
        assert_eq!(p.change_due, Money::zero());
    }
}
