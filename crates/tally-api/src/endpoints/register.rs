//! # Register Endpoints
//!
//! Session snapshot, cash movements, the close request and the Z-report.
//! Reconciliation itself happens in `tally_core::register`; `close()` only
//! persists a decision that was already made locally.

use tracing::{debug, info};

use tally_core::validation::{
    validate_cash_movement_amount, validate_counted_balance, validate_note, validate_reason,
};
use tally_core::{CashMovementKind, Money, Reconciliation, RegisterSession};

use crate::client::ApiClient;
use crate::dto::{
    CashMovementRecord, CashMovementRequest, CloseRegisterRequest, ClosedRegister,
    RegisterSessionPayload, ZReport,
};
use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct RegisterApi {
    client: ApiClient,
}

impl RegisterApi {
    pub fn new(client: ApiClient) -> Self {
        RegisterApi { client }
    }

    /// `GET /register/current`
    pub async fn current(&self) -> ApiResult<RegisterSession> {
        let payload: RegisterSessionPayload = self.client.get("register/current").await?;
        debug!(session_id = payload.id, "Register session loaded");
        Ok(payload.into())
    }

    /// `POST /register/cash-movement`
    ///
    /// Amount must be positive and a reason is required; both are checked
    /// before anything is sent.
    pub async fn cash_movement(
        &self,
        kind: CashMovementKind,
        amount: Money,
        reason: &str,
        notes: Option<&str>,
    ) -> ApiResult<CashMovementRecord> {
        validate_cash_movement_amount(amount)?;
        validate_reason(reason)?;
        validate_note(notes)?;

        let request = CashMovementRequest {
            kind,
            amount,
            reason: reason.trim().to_string(),
            notes: notes.map(str::to_string).filter(|n| !n.trim().is_empty()),
        };
        let record: CashMovementRecord =
            self.client.post("register/cash-movement", &request).await?;

        info!(kind = %kind, amount = %amount, "Cash movement recorded");
        Ok(record)
    }

    /// `POST /register/close`
    pub async fn close(
        &self,
        reconciliation: &Reconciliation,
        close_note: Option<&str>,
    ) -> ApiResult<ClosedRegister> {
        validate_counted_balance(reconciliation.counted)?;
        validate_note(close_note)?;

        let request = CloseRegisterRequest {
            closing_balance: reconciliation.counted,
            close_note: close_note.map(str::to_string).filter(|n| !n.trim().is_empty()),
            expected_cash: reconciliation.expected_cash,
            difference: reconciliation.difference,
        };
        let closed: ClosedRegister = self.client.post("register/close", &request).await?;

        info!(
            counted = %reconciliation.counted,
            difference = %reconciliation.difference,
            status = reconciliation.status.as_str(),
            "Register closed"
        );
        Ok(closed)
    }

    /// `GET /register/z-report`
    pub async fn z_report(&self) -> ApiResult<ZReport> {
        self.client.get("register/z-report").await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ApiClientError;
    use crate::test_support::MockBackend;
    use serde_json::json;
    use tally_core::register::reconcile;
    use tally_core::{CashMovementKind, Money};

    fn session_json() -> serde_json::Value {
        json!({
            "id": 12,
            "opening_balance": 100.0,
            "cash_sales_total": 250.0,
            "card_sales_total": 410.5,
            "total_cash_in": 50.0,
            "total_cash_out": 30.0,
            "opened_at": "2024-06-15T08:00:00Z",
            "cashier_name": "Dana"
        })
    }

    #[tokio::test]
    async fn test_current_session() {
        let backend = MockBackend::start().await;
        backend.on("GET", "/register/current", 200, session_json());

        let session = backend.client().register().current().await.unwrap();
        assert_eq!(session.id, 12);
        assert_eq!(session.card_sales_total.cents(), 41_050);
        assert_eq!(tally_core::register::expected_cash(&session).cents(), 37_000);
    }

    #[tokio::test]
    async fn test_close_sends_reconciliation() {
        let backend = MockBackend::start().await;
        backend
            .on("GET", "/register/current", 200, session_json())
            .on("POST", "/register/close", 200, json!({"id": 12}));

        let api = backend.client().register();
        let session = api.current().await.unwrap();
        let rec = reconcile(&session, Money::from_cents(36_500));

        api.close(&rec, Some("Short after recount")).await.unwrap();

        let body = &backend.requests_to("POST", "/register/close")[0].body;
        assert_eq!(
            body,
            &json!({
                "closing_balance": 365.0,
                "close_note": "Short after recount",
                "expected_cash": 370.0,
                "difference": -5.0
            })
        );
    }

    #[tokio::test]
    async fn test_cash_movement_payload() {
        let backend = MockBackend::start().await;
        backend.on(
            "POST",
            "/register/cash-movement",
            201,
            json!({"id": 3, "type": "in", "amount": "20.00", "reason": "Float top-up"}),
        );

        let record = backend
            .client()
            .register()
            .cash_movement(
                CashMovementKind::In,
                Money::from_cents(2_000),
                " Float top-up ",
                Some(""),
            )
            .await
            .unwrap();
        assert_eq!(record.amount.cents(), 2_000);

        let body = &backend.requests_to("POST", "/register/cash-movement")[0].body;
        assert_eq!(
            body,
            &json!({"type": "in", "amount": 20.0, "reason": "Float top-up", "notes": null})
        );
    }

    #[tokio::test]
    async fn test_invalid_cash_movement_sends_nothing() {
        let backend = MockBackend::start().await;
        let api = backend.client().register();

        let err = api
            .cash_movement(CashMovementKind::Out, Money::zero(), "Payout", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiClientError::InvalidInput(_)));

        let err = api
            .cash_movement(CashMovementKind::Out, Money::from_cents(500), "  ", None)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "reason is required");

        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_z_report() {
        let backend = MockBackend::start().await;
        backend.on(
            "GET",
            "/register/z-report",
            200,
            json!({
                "date": "2024-06-15",
                "transaction_count": 42,
                "total_sales": 1234.5,
                "cash_total": 600.0,
                "card_total": 534.5,
                "online_total": 100.0,
                "refunds_total": 12.0
            }),
        );

        let report = backend.client().register().z_report().await.unwrap();
        assert_eq!(report.transaction_count, 42);
        assert_eq!(report.total_sales.cents(), 123_450);
        assert_eq!(report.credit_total, Money::zero());
        assert_eq!(report.refunds_total.cents(), 1_200);
    }
}
