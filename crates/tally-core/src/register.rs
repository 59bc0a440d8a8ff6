//! # Register Reconciliation
//!
//! Compares the cash the drawer should hold with what the cashier counted,
//! and drives the two-step close confirmation.
//!
//! ## Expected Cash
//! ```text
//! expected = opening_balance + cash_sales_total + total_cash_in - total_cash_out
//! difference = counted - expected
//!
//!   |difference| < $0.01  ──► Balanced
//!   difference > 0        ──► Over
//!   difference < 0        ──► Short
//! ```
//!
//! Card sales never touch the drawer and are not part of the expected cash.
//!
//! ## Close Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  enter(counted)  ┌─────────┐  submit()   ┌────────┐          │
//! │   │ Idle │ ───────────────► │ Entered │ ──────────► │ Closed │          │
//! │   └──────┘                  └─────────┘  balanced   └────────┘          │
//! │      ▲                           │                       ▲              │
//! │      │ recount()        submit() │ discrepancy           │ mark_closed()│
//! │      │                           ▼                       │              │
//! │      │                ┌─────────────────────┐  confirm() │              │
//! │      └─────────────── │ PendingConfirmation │ ───────────┘              │
//! │                       └─────────────────────┘                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The flow only decides when the close request may be sent. The caller
//! posts it and then calls `mark_closed()`; a failed post leaves the flow
//! where it was so the operator can retry.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::RegisterSession;
use crate::validation::validate_counted_balance;
use crate::MONEY_TOLERANCE;

// =============================================================================
// Reconciliation
// =============================================================================

/// Cash the drawer should contain for `session`.
pub fn expected_cash(session: &RegisterSession) -> Money {
    session.opening_balance + session.cash_sales_total + session.total_cash_in
        - session.total_cash_out
}

/// How the counted balance compares with the expected cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    Balanced,
    Over,
    Short,
}

impl ReconciliationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconciliationStatus::Balanced => "balanced",
            ReconciliationStatus::Over => "over",
            ReconciliationStatus::Short => "short",
        }
    }
}

/// Outcome of comparing a counted drawer with the session totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reconciliation {
    pub expected_cash: Money,
    pub counted: Money,
    /// `counted - expected_cash`; positive when the drawer is over.
    pub difference: Money,
    pub status: ReconciliationStatus,
}

impl Reconciliation {
    /// True when closing needs an explicit second confirmation.
    pub fn requires_confirmation(&self) -> bool {
        self.status != ReconciliationStatus::Balanced
    }
}

/// Reconciles a counted closing balance against `session`.
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::register::{reconcile, ReconciliationStatus};
/// # use tally_core::types::RegisterSession;
/// # let session = RegisterSession {
/// #     id: 1,
/// #     opening_balance: Money::from_cents(10_000),
/// #     cash_sales_total: Money::from_cents(25_000),
/// #     card_sales_total: Money::zero(),
/// #     total_cash_in: Money::from_cents(5_000),
/// #     total_cash_out: Money::from_cents(3_000),
/// #     opened_at: chrono::Utc::now(),
/// #     cashier_name: None,
/// # };
///
/// let rec = reconcile(&session, Money::from_cents(36_500));
/// assert_eq!(rec.expected_cash.cents(), 37_000);
/// assert_eq!(rec.difference.cents(), -500);
/// assert_eq!(rec.status, ReconciliationStatus::Short);
/// assert!(rec.requires_confirmation());
/// ```
pub fn reconcile(session: &RegisterSession, counted: Money) -> Reconciliation {
    let expected = expected_cash(session);
    let difference = counted - expected;

    let status = if difference.abs() < MONEY_TOLERANCE {
        ReconciliationStatus::Balanced
    } else if difference.is_positive() {
        ReconciliationStatus::Over
    } else {
        ReconciliationStatus::Short
    };

    Reconciliation {
        expected_cash: expected,
        counted,
        difference,
        status,
    }
}

// =============================================================================
// Close Flow
// =============================================================================

/// Where the close flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CloseState {
    Idle,
    Entered {
        reconciliation: Reconciliation,
    },
    PendingConfirmation {
        reconciliation: Reconciliation,
        confirmed: bool,
    },
    Closed {
        reconciliation: Reconciliation,
    },
}

impl CloseState {
    fn name(&self) -> &'static str {
        match self {
            CloseState::Idle => "idle",
            CloseState::Entered { .. } => "entered",
            CloseState::PendingConfirmation { .. } => "pending confirmation",
            CloseState::Closed { .. } => "closed",
        }
    }
}

/// What the caller should do after `submit()` or `confirm()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Send the close request with this reconciliation.
    Proceed(Reconciliation),
    /// Show the discrepancy and ask the operator to confirm or recount.
    NeedsConfirmation(Reconciliation),
}

/// Close-register state machine for one session.
#[derive(Debug, Clone)]
pub struct RegisterCloseFlow {
    session: RegisterSession,
    state: CloseState,
}

impl RegisterCloseFlow {
    pub fn new(session: RegisterSession) -> Self {
        RegisterCloseFlow {
            session,
            state: CloseState::Idle,
        }
    }

    pub fn session(&self) -> &RegisterSession {
        &self.session
    }

    pub fn state(&self) -> CloseState {
        self.state
    }

    /// Reconciliation for the balance currently entered, if any.
    pub fn reconciliation(&self) -> Option<Reconciliation> {
        match self.state {
            CloseState::Idle => None,
            CloseState::Entered { reconciliation }
            | CloseState::PendingConfirmation { reconciliation, .. }
            | CloseState::Closed { reconciliation } => Some(reconciliation),
        }
    }

    /// Records the counted balance. Allowed from `Idle` and `Entered`.
    pub fn enter(&mut self, counted: Money) -> CoreResult<Reconciliation> {
        match self.state {
            CloseState::Idle | CloseState::Entered { .. } => {}
            _ => return Err(self.invalid("enter a balance")),
        }

        validate_counted_balance(counted)?;
        let reconciliation = reconcile(&self.session, counted);
        self.state = CloseState::Entered { reconciliation };
        Ok(reconciliation)
    }

    /// First close attempt.
    ///
    /// A balanced drawer may proceed straight away. A discrepancy moves the
    /// flow to `PendingConfirmation`.
    pub fn submit(&mut self) -> CoreResult<CloseDecision> {
        match self.state {
            CloseState::Entered { reconciliation } => {
                if !reconciliation.requires_confirmation() {
                    return Ok(CloseDecision::Proceed(reconciliation));
                }
                self.state = CloseState::PendingConfirmation {
                    reconciliation,
                    confirmed: false,
                };
                Ok(CloseDecision::NeedsConfirmation(reconciliation))
            }
            // Submitting again without confirming just repeats the prompt
            CloseState::PendingConfirmation {
                reconciliation,
                confirmed: false,
            } => Ok(CloseDecision::NeedsConfirmation(reconciliation)),
            CloseState::PendingConfirmation {
                reconciliation,
                confirmed: true,
            } => Ok(CloseDecision::Proceed(reconciliation)),
            _ => Err(self.invalid("submit")),
        }
    }

    /// Second close attempt: the operator accepts the discrepancy.
    pub fn confirm(&mut self) -> CoreResult<CloseDecision> {
        match self.state {
            CloseState::PendingConfirmation { reconciliation, .. } => {
                self.state = CloseState::PendingConfirmation {
                    reconciliation,
                    confirmed: true,
                };
                Ok(CloseDecision::Proceed(reconciliation))
            }
            _ => Err(self.invalid("confirm")),
        }
    }

    /// Abandons the confirmation and returns to `Idle`.
    pub fn recount(&mut self) -> CoreResult<()> {
        match self.state {
            CloseState::PendingConfirmation { .. } => {
                self.state = CloseState::Idle;
                Ok(())
            }
            _ => Err(self.invalid("recount")),
        }
    }

    /// Records that the backend accepted the close request.
    pub fn mark_closed(&mut self) -> CoreResult<Reconciliation> {
        let reconciliation = match self.state {
            CloseState::Entered { reconciliation } if !reconciliation.requires_confirmation() => {
                reconciliation
            }
            CloseState::PendingConfirmation {
                reconciliation,
                confirmed: true,
            } => reconciliation,
            _ => return Err(self.invalid("close")),
        };

        self.state = CloseState::Closed { reconciliation };
        Ok(reconciliation)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, CloseState::Closed { .. })
    }

    fn invalid(&self, action: &'static str) -> CoreError {
        CoreError::InvalidCloseTransition {
            state: self.state.name(),
            action,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session() -> RegisterSession {
        RegisterSession {
            id: 9,
            opening_balance: Money::from_cents(10_000),
            cash_sales_total: Money::from_cents(25_000),
            card_sales_total: Money::from_cents(80_000),
            total_cash_in: Money::from_cents(5_000),
            total_cash_out: Money::from_cents(3_000),
            opened_at: Utc::now(),
            cashier_name: Some("Dana".to_string()),
        }
    }

    #[test]
    fn test_expected_cash_ignores_card_sales() {
        assert_eq!(expected_cash(&session()).cents(), 37_000);
    }

    #[test]
    fn test_reconcile_balanced() {
        let rec = reconcile(&session(), Money::from_cents(37_000));
        assert_eq!(rec.status, ReconciliationStatus::Balanced);
        assert_eq!(rec.difference, Money::zero());
        assert!(!rec.requires_confirmation());
    }

    #[test]
    fn test_reconcile_short_and_over() {
        let short = reconcile(&session(), Money::from_cents(36_500));
        assert_eq!(short.status, ReconciliationStatus::Short);
        assert_eq!(short.difference.cents(), -500);
        assert!(short.requires_confirmation());

        let over = reconcile(&session(), Money::from_cents(37_001));
        assert_eq!(over.status, ReconciliationStatus::Over);
        assert_eq!(over.difference.cents(), 1);
        assert!(over.requires_confirmation());
    }

    #[test]
    fn test_balanced_close_skips_confirmation() {
        let mut flow = RegisterCloseFlow::new(session());
        flow.enter(Money::from_cents(37_000)).unwrap();

        let decision = flow.submit().unwrap();
        assert!(matches!(decision, CloseDecision::Proceed(_)));

        flow.mark_closed().unwrap();
        assert!(flow.is_closed());
    }

    #[test]
    fn test_discrepancy_requires_second_attempt() {
        let mut flow = RegisterCloseFlow::new(session());
        flow.enter(Money::from_cents(36_500)).unwrap();

        let first = flow.submit().unwrap();
        assert!(matches!(first, CloseDecision::NeedsConfirmation(r) if r.difference.cents() == -500));
        assert!(matches!(
            flow.state(),
            CloseState::PendingConfirmation { confirmed: false, .. }
        ));

        // Cannot close before confirming
        assert!(flow.mark_closed().is_err());

        let second = flow.confirm().unwrap();
        assert!(matches!(second, CloseDecision::Proceed(_)));
        let rec = flow.mark_closed().unwrap();
        assert_eq!(rec.status, ReconciliationStatus::Short);
        assert!(flow.is_closed());
    }

    #[test]
    fn test_recount_returns_to_idle() {
        let mut flow = RegisterCloseFlow::new(session());
        flow.enter(Money::from_cents(40_000)).unwrap();
        flow.submit().unwrap();
        flow.recount().unwrap();

        assert_eq!(flow.state(), CloseState::Idle);
        assert!(flow.reconciliation().is_none());

        let rec = flow.enter(Money::from_cents(37_000)).unwrap();
        assert_eq!(rec.status, ReconciliationStatus::Balanced);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut flow = RegisterCloseFlow::new(session());
        assert!(flow.submit().is_err());
        assert!(flow.confirm().is_err());
        assert!(flow.recount().is_err());
        assert!(flow.mark_closed().is_err());

        flow.enter(Money::from_cents(36_000)).unwrap();
        flow.submit().unwrap();
        let err = flow.enter(Money::from_cents(37_000)).unwrap_err();
        assert!(err.to_string().contains("pending confirmation"));

        flow.confirm().unwrap();
        flow.mark_closed().unwrap();
        assert!(flow.enter(Money::zero()).is_err());
        assert!(flow.submit().is_err());
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut flow = RegisterCloseFlow::new(session());
        assert!(flow.enter(Money::from_cents(-1)).is_err());
        assert_eq!(flow.state(), CloseState::Idle);
    }

    #[test]
    fn test_failed_post_can_be_retried() {
        let mut flow = RegisterCloseFlow::new(session());
        flow.enter(Money::from_cents(36_000)).unwrap();
        flow.submit().unwrap();
        flow.confirm().unwrap();

        // Close request failed; submitting again proceeds without a new prompt
        assert!(matches!(flow.submit().unwrap(), CloseDecision::Proceed(_)));
    }
}
