//! # Register Commands
//!
//! ## Close Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  begin_close ──► GET /register/current ──► RegisterCloseFlow (Idle)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  submit_close(counted)                                                  │
//! │       ├── balanced ─────────────► POST /register/close ──► Closed       │
//! │       └── over / short ─────────► NeedsConfirmation (nothing sent)      │
//! │                 │                                                       │
//! │                 ├── confirm_close ──► POST /register/close ──► Closed   │
//! │                 └── recount ────────► Idle                              │
//! │                                                                         │
//! │  A failed POST leaves the flow where it was, so the same call can be    │
//! │  made again.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use tally_api::dto::{CashMovementRecord, ClosedRegister, ZReport};
use tally_api::ApiClient;
use tally_core::register::{expected_cash, CloseDecision, Reconciliation, RegisterCloseFlow};
use tally_core::{CashMovementKind, Money, RegisterSession};

use crate::error::{CommandError, CommandResult};

#[derive(Debug, Clone, Serialize)]
pub struct RegisterStatus {
    pub session: RegisterSession,
    pub expected_cash: Money,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CloseOutcome {
    /// Drawer is over or short; the operator must confirm or recount.
    NeedsConfirmation { reconciliation: Reconciliation },
    Closed {
        reconciliation: Reconciliation,
        record: ClosedRegister,
    },
}

pub async fn load_session(api: &ApiClient) -> CommandResult<RegisterStatus> {
    let session = api.register().current().await?;
    let expected_cash = expected_cash(&session);

    debug!(session_id = session.id, expected = %expected_cash, "Register status loaded");
    Ok(RegisterStatus {
        session,
        expected_cash,
    })
}

pub async fn record_cash_movement(
    api: &ApiClient,
    kind: CashMovementKind,
    amount: Money,
    reason: &str,
    notes: Option<&str>,
) -> CommandResult<CashMovementRecord> {
    debug!(kind = %kind, amount = %amount, "record_cash_movement command");

    api.register()
        .cash_movement(kind, amount, reason, notes)
        .await
        .map_err(|e| {
            warn!(kind = %kind, error = %e, "Cash movement not recorded");
            CommandError::from(e)
        })
}

/// Starts a close against the current register session.
pub async fn begin_close(api: &ApiClient) -> CommandResult<RegisterCloseFlow> {
    let session = api.register().current().await?;
    Ok(RegisterCloseFlow::new(session))
}

/// First close attempt with the counted drawer balance.
pub async fn submit_close(
    api: &ApiClient,
    flow: &mut RegisterCloseFlow,
    counted: Money,
    note: Option<&str>,
) -> CommandResult<CloseOutcome> {
    debug!(session_id = flow.session().id, counted = %counted, "submit_close command");

    flow.enter(counted)?;
    match flow.submit()? {
        CloseDecision::Proceed(reconciliation) => send_close(api, flow, reconciliation, note).await,
        CloseDecision::NeedsConfirmation(reconciliation) => {
            info!(
                expected = %reconciliation.expected_cash,
                counted = %reconciliation.counted,
                difference = %reconciliation.difference,
                status = reconciliation.status.as_str(),
                "Drawer discrepancy, confirmation required"
            );
            Ok(CloseOutcome::NeedsConfirmation { reconciliation })
        }
    }
}

/// Second close attempt: accepts the discrepancy and closes.
pub async fn confirm_close(
    api: &ApiClient,
    flow: &mut RegisterCloseFlow,
    note: Option<&str>,
) -> CommandResult<CloseOutcome> {
    match flow.confirm()? {
        CloseDecision::Proceed(reconciliation) | CloseDecision::NeedsConfirmation(reconciliation) => {
            send_close(api, flow, reconciliation, note).await
        }
    }
}

/// Drops the pending confirmation so a new count can be entered.
pub fn recount(flow: &mut RegisterCloseFlow) -> CommandResult<()> {
    flow.recount()?;
    debug!(session_id = flow.session().id, "Recount requested");
    Ok(())
}

async fn send_close(
    api: &ApiClient,
    flow: &mut RegisterCloseFlow,
    reconciliation: Reconciliation,
    note: Option<&str>,
) -> CommandResult<CloseOutcome> {
    let record = match api.register().close(&reconciliation, note).await {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "Register close not accepted");
            return Err(e.into());
        }
    };

    flow.mark_closed()?;
    Ok(CloseOutcome::Closed {
        reconciliation,
        record,
    })
}

pub async fn z_report(api: &ApiClient) -> CommandResult<ZReport> {
    let report = api.register().z_report().await?;
    info!(
        transactions = report.transaction_count,
        total = %report.total_sales,
        "Z-report loaded"
    );
    Ok(report)
}
