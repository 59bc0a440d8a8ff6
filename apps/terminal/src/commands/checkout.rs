//! # Checkout Commands
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  select_customer / set_manual_discount       (local only)               │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  apply_coupon ───────► POST /coupons/validate                           │
//! │  load_loyalty ───────► GET  /loyalty/config, /loyalty/customer/:id      │
//! │  redeem_points                               (local only)               │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  quote ──────────────► compose()             (local only)               │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  submit_sale                                                            │
//! │    ├── empty cart / bad tender ──► error, NOTHING SENT                  │
//! │    ├── POST /sales fails ────────► error, cart kept                     │
//! │    └── POST /sales ok ───────────► cart + checkout cleared              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use tally_api::dto::{CompleteSaleRequest, CreateSaleRequest, SaleItemPayload, SaleRecord};
use tally_api::ApiClient;
use tally_core::payment::resolve;
use tally_core::pricing::compose;
use tally_core::validation::{validate_discount, validate_note};
use tally_core::{
    AppliedCoupon, Cart, CoreError, LoyaltyAccount, LoyaltyRedemption, Money, PriceBreakdown,
    PriceInputs, ResolvedPayment, Tender,
};

use crate::error::{CommandError, CommandResult, ErrorCode};
use crate::state::{CartState, Checkout, CheckoutState};

/// What the operator sees after a sale is accepted.
#[derive(Debug, Clone, Serialize)]
pub struct SaleReceipt {
    pub sale: SaleRecord,
    pub breakdown: PriceBreakdown,
    pub payment: ResolvedPayment,
}

/// A sale that was saved earlier and is paid now.
#[derive(Debug, Clone)]
pub struct PendingPayment<'a> {
    pub sale_id: i64,
    /// Total still owed on the pending sale.
    pub total: Money,
    pub tender: Tender,
    pub customer_id: i64,
    pub note: Option<&'a str>,
}

// =============================================================================
// Checkout Setup
// =============================================================================

pub fn select_customer(checkout: &CheckoutState, customer_id: i64) -> CommandResult<()> {
    if customer_id <= 0 {
        return Err(CommandError::validation("customer id must be positive"));
    }
    checkout.with_checkout_mut(|c| c.select_customer(customer_id));
    debug!(customer_id, "Customer selected");
    Ok(())
}

pub fn set_manual_discount(checkout: &CheckoutState, discount: Money) -> CommandResult<()> {
    validate_discount(discount)?;
    checkout.with_checkout_mut(|c| c.manual_discount = discount);
    debug!(discount = %discount, "Manual discount set");
    Ok(())
}

/// Validates a coupon against the current order total and keeps it.
///
/// The order total sent is the cart subtotal less the manual discount.
/// A rejected coupon leaves any previously applied coupon in place.
pub async fn apply_coupon(
    api: &ApiClient,
    cart: &CartState,
    checkout: &CheckoutState,
    code: &str,
) -> CommandResult<AppliedCoupon> {
    let subtotal = cart.with_cart(Cart::subtotal);
    let manual = checkout.with_checkout(|c| c.manual_discount);
    let order_total = (subtotal - manual).non_negative();

    debug!(code, order_total = %order_total, "apply_coupon command");

    let coupon = api
        .coupons()
        .validate(code, order_total)
        .await
        .map_err(|e| {
            warn!(code, error = %e, "Coupon not applied");
            CommandError::from(e)
        })?;

    checkout.with_checkout_mut(|c| c.coupon = Some(coupon.clone()));
    Ok(coupon)
}

pub fn remove_coupon(checkout: &CheckoutState) {
    checkout.with_checkout_mut(|c| c.coupon = None);
}

/// Fetches the selected customer's loyalty balance.
pub async fn load_loyalty(
    api: &ApiClient,
    checkout: &CheckoutState,
) -> CommandResult<LoyaltyAccount> {
    let customer_id = checkout.with_checkout(|c| c.customer_id);
    if checkout.with_checkout(Checkout::is_walk_in) {
        return Err(CommandError::validation(
            "Select a customer to redeem loyalty points",
        ));
    }

    let account = api.loyalty().account(customer_id).await?;

    checkout.with_checkout_mut(|c| {
        // The customer may have changed while the request was in flight
        if c.customer_id == account.customer_id {
            c.loyalty = Some(account.clone());
        }
    });
    Ok(account)
}

/// Sets the number of points to redeem. Zero clears the redemption.
///
/// Requests above the balance are capped; a capped amount below the
/// program minimum is rejected.
pub fn redeem_points(checkout: &CheckoutState, points: i64) -> CommandResult<i64> {
    checkout.with_checkout_mut(|c| -> CommandResult<i64> {
        if points == 0 {
            c.points_requested = 0;
            return Ok(0);
        }
        let account = c
            .loyalty
            .as_ref()
            .ok_or_else(|| CommandError::validation("Loyalty balance has not been loaded"))?;

        let redemption = LoyaltyRedemption::against(account, points)?;
        c.points_requested = points;
        Ok(redemption.points_used())
    })
}

// =============================================================================
// Pricing
// =============================================================================

fn price(cart: &Cart, checkout: &Checkout) -> CommandResult<PriceBreakdown> {
    let loyalty = match (&checkout.loyalty, checkout.points_requested) {
        (Some(account), points) if points > 0 => {
            Some(LoyaltyRedemption::against(account, points)?)
        }
        _ => None,
    };

    Ok(compose(&PriceInputs {
        subtotal: cart.subtotal(),
        manual_discount: checkout.manual_discount,
        coupon_discount: checkout
            .coupon
            .as_ref()
            .map_or(Money::zero(), |c| c.discount),
        loyalty,
    }))
}

/// Current price breakdown. Touches nothing and sends nothing.
pub fn quote(cart: &CartState, checkout: &CheckoutState) -> CommandResult<PriceBreakdown> {
    let checkout = checkout.snapshot();
    cart.with_cart(|cart| price(cart, &checkout))
}

// =============================================================================
// Submission
// =============================================================================

fn sale_request(
    cart: &Cart,
    checkout: &Checkout,
    breakdown: &PriceBreakdown,
    payment: &ResolvedPayment,
    note: Option<&str>,
) -> CreateSaleRequest {
    CreateSaleRequest {
        items: cart
            .lines()
            .iter()
            .map(|line| SaleItemPayload {
                product_id: line.product_id,
                variant_id: line.variant_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect(),
        customer_id: checkout.customer_id,
        discount: breakdown.manual_discount,
        coupon_code: checkout.coupon.as_ref().map(|c| c.code.clone()),
        coupon_discount: breakdown.coupon_discount,
        loyalty_points_used: breakdown.loyalty_points_used,
        loyalty_discount: breakdown.loyalty_discount,
        total_amount: breakdown.final_total,
        payment_method: payment.method,
        amount_paid: payment.amount_paid,
        change_due: payment.change_due,
        cash_amount: payment.cash_portion,
        card_amount: payment.card_portion,
        due_date: payment.due_date,
        note: note.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string),
    }
}

/// Prices the cart, resolves the tender and submits the sale.
///
/// Every local check runs before the request is built. The cart and
/// checkout are cleared only once the backend has accepted the sale.
pub async fn submit_sale(
    api: &ApiClient,
    cart: &CartState,
    checkout: &CheckoutState,
    tender: &Tender,
    note: Option<&str>,
    today: NaiveDate,
) -> CommandResult<SaleReceipt> {
    let cart_snapshot = cart.snapshot();
    let checkout_snapshot = checkout.snapshot();

    debug!(
        items = cart_snapshot.item_count(),
        customer_id = checkout_snapshot.customer_id,
        method = %tender.method(),
        "submit_sale command"
    );

    if cart_snapshot.is_empty() {
        warn!("Sale blocked: cart is empty");
        return Err(CoreError::EmptyCart.into());
    }
    validate_note(note)?;

    let breakdown = price(&cart_snapshot, &checkout_snapshot)?;
    let payment = resolve(
        breakdown.final_total,
        tender,
        checkout_snapshot.customer_id,
        today,
    )
    .map_err(|e| {
        warn!(error = %e, "Sale blocked: tender rejected");
        CommandError::from(e)
    })?;

    let request = sale_request(
        &cart_snapshot,
        &checkout_snapshot,
        &breakdown,
        &payment,
        note,
    );

    let sale = match api.sales().create(&request).await {
        Ok(sale) => sale,
        Err(e) => {
            warn!(error = %e, "Sale not accepted, cart kept");
            return Err(e.into());
        }
    };

    cart.with_cart_mut(Cart::clear);
    checkout.with_checkout_mut(Checkout::reset);

    info!(
        sale_id = ?sale.id,
        total = %breakdown.final_total,
        method = %payment.method,
        change = %payment.change_due,
        "Sale submitted"
    );

    Ok(SaleReceipt {
        sale,
        breakdown,
        payment,
    })
}

/// Pays a pending sale.
///
/// The pending total goes through the same tender rules as a new sale.
/// The completion body carries only method and amount, so split and
/// credit tenders are refused here.
pub async fn complete_pending_sale(
    api: &ApiClient,
    pending: &PendingPayment<'_>,
    today: NaiveDate,
) -> CommandResult<SaleRecord> {
    debug!(
        sale_id = pending.sale_id,
        total = %pending.total,
        method = %pending.tender.method(),
        "complete_pending_sale command"
    );

    if pending.total.is_negative() {
        return Err(CommandError::validation("total cannot be negative"));
    }
    validate_note(pending.note)?;

    if matches!(pending.tender, Tender::Split { .. } | Tender::Credit { .. }) {
        warn!(
            sale_id = pending.sale_id,
            method = %pending.tender.method(),
            "Completion blocked: tender not allowed"
        );
        return Err(CommandError::new(
            ErrorCode::PaymentError,
            format!(
                "A pending sale cannot be completed with {} payment",
                pending.tender.method()
            ),
        ));
    }

    let payment = resolve(pending.total, &pending.tender, pending.customer_id, today)?;

    let request = CompleteSaleRequest {
        payment_method: payment.method,
        amount_paid: payment.amount_paid,
        note: pending
            .note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    };

    Ok(api.sales().complete(pending.sale_id, &request).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::parse_cart;
    use serde_json::json;
    use tally_api::test_support::MockBackend;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    /// 2 × 25.00 = 50.00
    fn cart() -> CartState {
        CartState::with_contents(
            parse_cart(r#"[{"product_id": 7, "name": "Tea tin", "quantity": 2, "unit_price": 25}]"#)
                .unwrap(),
        )
    }

    fn loyalty_routes(backend: &MockBackend) {
        backend
            .on(
                "GET",
                "/loyalty/config",
                200,
                json!({"amount_per_point": 0.10, "min_redeem_points": 10}),
            )
            .on("GET", "/loyalty/customer/42", 200, json!({"points": 120}));
    }

    #[test]
    fn test_quote_composes_every_discount() {
        let cart = cart();
        let checkout = CheckoutState::default();
        checkout.with_checkout_mut(|c| {
            c.select_customer(42);
            c.manual_discount = Money::from_cents(500);
            c.coupon = Some(AppliedCoupon {
                code: "SAVE10".into(),
                discount: Money::from_cents(1_000),
            });
            c.loyalty = Some(LoyaltyAccount {
                customer_id: 42,
                points: 120,
                point_rate: tally_core::PointRate::from_decimal(0.10),
                min_redeem_points: 0,
            });
            c.points_requested = 150;
        });

        let breakdown = quote(&cart, &checkout).unwrap();
        assert_eq!(breakdown.loyalty_points_used, 120);
        assert_eq!(breakdown.loyalty_discount.cents(), 1_200);
        assert_eq!(breakdown.final_total.cents(), 5_000 - 500 - 1_000 - 1_200);

        // Same inputs, same answer
        assert_eq!(quote(&cart, &checkout).unwrap(), breakdown);
    }

    #[test]
    fn test_quote_never_negative() {
        let cart = cart();
        let checkout = CheckoutState::default();
        set_manual_discount(&checkout, Money::from_cents(9_000)).unwrap();

        assert_eq!(quote(&cart, &checkout).unwrap().final_total, Money::zero());
    }

    #[test]
    fn test_negative_manual_discount_rejected() {
        let checkout = CheckoutState::default();
        let err = set_manual_discount(&checkout, Money::from_cents(-100)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_apply_coupon_sends_discounted_total() {
        let backend = MockBackend::start().await;
        backend.on(
            "POST",
            "/coupons/validate",
            200,
            json!({"valid": true, "discount_amount": "10.00"}),
        );

        let cart = cart();
        let checkout = CheckoutState::default();
        set_manual_discount(&checkout, Money::from_cents(500)).unwrap();

        let coupon = apply_coupon(&backend.client(), &cart, &checkout, "save10")
            .await
            .unwrap();
        assert_eq!(coupon.discount.cents(), 1_000);
        assert_eq!(quote(&cart, &checkout).unwrap().final_total.cents(), 3_500);

        let body = &backend.requests_to("POST", "/coupons/validate")[0].body;
        assert_eq!(body["order_total"], 45.0);
    }

    #[tokio::test]
    async fn test_rejected_coupon_surfaces_backend_message() {
        let backend = MockBackend::start().await;
        backend.on(
            "POST",
            "/coupons/validate",
            422,
            json!({"message": "Coupon has expired"}),
        );

        let checkout = CheckoutState::default();
        let err = apply_coupon(&backend.client(), &cart(), &checkout, "OLD")
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "Coupon has expired");
        assert!(checkout.snapshot().coupon.is_none());
    }

    #[tokio::test]
    async fn test_negative_coupon_discount_not_applied() {
        let backend = MockBackend::start().await;
        backend.on(
            "POST",
            "/coupons/validate",
            200,
            json!({"discount_amount": -20}),
        );

        let cart = cart();
        let checkout = CheckoutState::default();
        let err = apply_coupon(&backend.client(), &cart, &checkout, "ODD")
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Rejected);
        assert!(checkout.snapshot().coupon.is_none());
        assert_eq!(quote(&cart, &checkout).unwrap().final_total.cents(), 5_000);
    }

    #[tokio::test]
    async fn test_loyalty_redemption_is_capped() {
        let backend = MockBackend::start().await;
        loyalty_routes(&backend);

        let checkout = CheckoutState::default();
        select_customer(&checkout, 42).unwrap();
        load_loyalty(&backend.client(), &checkout).await.unwrap();

        assert_eq!(redeem_points(&checkout, 150).unwrap(), 120);
        let breakdown = quote(&cart(), &checkout).unwrap();
        assert_eq!(breakdown.loyalty_discount.cents(), 1_200);
    }

    #[tokio::test]
    async fn test_loyalty_below_minimum_rejected() {
        let backend = MockBackend::start().await;
        loyalty_routes(&backend);

        let checkout = CheckoutState::default();
        select_customer(&checkout, 42).unwrap();
        load_loyalty(&backend.client(), &checkout).await.unwrap();

        let err = redeem_points(&checkout, 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(checkout.snapshot().points_requested, 0);
    }

    #[tokio::test]
    async fn test_walk_in_loyalty_sends_nothing() {
        let backend = MockBackend::start().await;
        let checkout = CheckoutState::default();

        let err = load_loyalty(&backend.client(), &checkout).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_sale_clears_cart_on_success() {
        let backend = MockBackend::start().await;
        backend.on(
            "POST",
            "/sales",
            201,
            json!({"id": 900, "invoice_number": "INV-900", "total_amount": 50.0}),
        );

        let cart = cart();
        let checkout = CheckoutState::default();
        let tender = Tender::Cash {
            tendered: Some(Money::from_cents(6_000)),
        };

        let receipt = submit_sale(&backend.client(), &cart, &checkout, &tender, None, today())
            .await
            .unwrap();

        assert_eq!(receipt.sale.id, Some(900));
        assert_eq!(receipt.payment.change_due.cents(), 1_000);
        assert!(cart.with_cart(Cart::is_empty));

        let body = &backend.requests_to("POST", "/sales")[0].body;
        assert_eq!(body["customer_id"], 1);
        assert_eq!(body["total_amount"], 50.0);
        assert_eq!(body["amount_paid"], 60.0);
        assert_eq!(body["change_due"], 10.0);
        assert_eq!(body["items"][0]["quantity"], 2);
    }

    #[tokio::test]
    async fn test_split_mismatch_sends_nothing() {
        let backend = MockBackend::start().await;
        let cart = CartState::with_contents(
            parse_cart(r#"[{"product_id": 1, "quantity": 1, "unit_price": 100}]"#).unwrap(),
        );
        let checkout = CheckoutState::default();

        let tender = Tender::Split {
            cash: Money::from_cents(6_000),
            card: Money::from_cents(3_999),
        };
        let err = submit_sale(&backend.client(), &cart, &checkout, &tender, None, today())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PaymentError);
        assert!(err.message.contains("do not match"));
        assert_eq!(backend.request_count(), 0);
        assert_eq!(cart.totals().item_count, 1);
    }

    #[tokio::test]
    async fn test_split_within_a_cent_is_sent() {
        let backend = MockBackend::start().await;
        backend.on("POST", "/sales", 201, json!({"id": 1, "total_amount": 100}));
        let cart = CartState::with_contents(
            parse_cart(r#"[{"product_id": 1, "quantity": 1, "unit_price": 100}]"#).unwrap(),
        );

        let tender = Tender::Split {
            cash: Money::from_cents(6_001),
            card: Money::from_cents(3_999),
        };
        submit_sale(
            &backend.client(),
            &cart,
            &CheckoutState::default(),
            &tender,
            None,
            today(),
        )
        .await
        .unwrap();

        let body = &backend.requests_to("POST", "/sales")[0].body;
        assert_eq!(body["payment_method"], "split");
        assert_eq!(body["cash_amount"], 60.01);
        assert_eq!(body["card_amount"], 39.99);
    }

    #[tokio::test]
    async fn test_walk_in_credit_sends_nothing() {
        let backend = MockBackend::start().await;
        let tender = Tender::Credit {
            due_date: NaiveDate::from_ymd_opt(2024, 7, 1),
        };

        let err = submit_sale(
            &backend.client(),
            &cart(),
            &CheckoutState::default(),
            &tender,
            None,
            today(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.message, "Credit sales require a registered customer");
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_credit_sale_for_named_customer() {
        let backend = MockBackend::start().await;
        backend.on("POST", "/sales", 201, json!({"id": 3, "total_amount": 50}));

        let checkout = CheckoutState::default();
        select_customer(&checkout, 42).unwrap();
        let tender = Tender::Credit {
            due_date: NaiveDate::from_ymd_opt(2024, 7, 1),
        };

        let receipt = submit_sale(&backend.client(), &cart(), &checkout, &tender, None, today())
            .await
            .unwrap();
        assert_eq!(receipt.payment.outstanding.cents(), 5_000);

        let body = &backend.requests_to("POST", "/sales")[0].body;
        assert_eq!(body["amount_paid"], 0.0);
        assert_eq!(body["due_date"], "2024-07-01");
    }

    #[tokio::test]
    async fn test_empty_cart_sends_nothing() {
        let backend = MockBackend::start().await;
        let err = submit_sale(
            &backend.client(),
            &CartState::new(),
            &CheckoutState::default(),
            &Tender::Cash { tendered: None },
            None,
            today(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_server_failure_keeps_cart() {
        let backend = MockBackend::start().await;
        backend.on("POST", "/sales", 409, json!({"message": "Out of stock"}));

        let cart = cart();
        let checkout = CheckoutState::default();
        set_manual_discount(&checkout, Money::from_cents(200)).unwrap();

        let err = submit_sale(
            &backend.client(),
            &cart,
            &checkout,
            &Tender::Card { amount: None },
            None,
            today(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.message, "Out of stock");
        assert_eq!(cart.totals().total_quantity, 2);
        assert_eq!(checkout.snapshot().manual_discount.cents(), 200);
    }

    #[tokio::test]
    async fn test_sale_id_key_clears_cart() {
        let backend = MockBackend::start().await;
        backend.on(
            "POST",
            "/sales",
            201,
            json!({"message": "Sale created", "sale_id": 55}),
        );

        let cart = cart();
        let receipt = submit_sale(
            &backend.client(),
            &cart,
            &CheckoutState::default(),
            &Tender::Card { amount: None },
            None,
            today(),
        )
        .await
        .unwrap();

        assert_eq!(receipt.sale.id, Some(55));
        assert!(cart.with_cart(Cart::is_empty));
    }

    #[tokio::test]
    async fn test_accepted_sale_with_null_body_clears_cart() {
        let backend = MockBackend::start().await;
        backend.on("POST", "/sales", 201, serde_json::Value::Null);

        let cart = cart();
        let receipt = submit_sale(
            &backend.client(),
            &cart,
            &CheckoutState::default(),
            &Tender::Card { amount: None },
            None,
            today(),
        )
        .await
        .unwrap();

        assert_eq!(receipt.sale.id, None);
        assert_eq!(receipt.sale.total_amount.cents(), 5_000);
        assert!(cart.with_cart(Cart::is_empty));
        assert_eq!(backend.requests_to("POST", "/sales").len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_backend_keeps_cart() {
        let client = MockBackend::unreachable_client().await;
        let cart = cart();

        let err = submit_sale(
            &client,
            &cart,
            &CheckoutState::default(),
            &Tender::Online { amount: None },
            None,
            today(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::Unavailable);
        assert_eq!(err.message, tally_api::GENERIC_FAILURE_MESSAGE);
        assert!(!cart.with_cart(Cart::is_empty));
    }

    #[tokio::test]
    async fn test_complete_pending_sale() {
        let backend = MockBackend::start().await;
        backend.on(
            "PUT",
            "/sales/77/complete",
            200,
            json!({"id": 77, "status": "completed", "total_amount": 40}),
        );

        let pending = PendingPayment {
            sale_id: 77,
            total: Money::from_cents(4_000),
            tender: Tender::Cash {
                tendered: Some(Money::from_cents(5_000)),
            },
            customer_id: 1,
            note: Some("  "),
        };
        let sale = complete_pending_sale(&backend.client(), &pending, today())
            .await
            .unwrap();
        assert_eq!(sale.id, Some(77));

        let body = &backend.requests_to("PUT", "/sales/77/complete")[0].body;
        assert_eq!(
            body,
            &json!({"payment_method": "cash", "amount_paid": 50.0, "note": null})
        );
    }

    #[tokio::test]
    async fn test_complete_pending_sale_checks_tender() {
        let backend = MockBackend::start().await;
        let pending = PendingPayment {
            sale_id: 77,
            total: Money::from_cents(4_000),
            tender: Tender::Cash {
                tendered: Some(Money::from_cents(3_000)),
            },
            customer_id: 1,
            note: None,
        };

        let err = complete_pending_sale(&backend.client(), &pending, today())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_complete_pending_sale_refuses_split_and_credit() {
        let backend = MockBackend::start().await;
        let tenders = [
            Tender::Split {
                cash: Money::from_cents(2_000),
                card: Money::from_cents(2_000),
            },
            Tender::Credit {
                due_date: NaiveDate::from_ymd_opt(2024, 7, 15),
            },
        ];

        for tender in tenders {
            let pending = PendingPayment {
                sale_id: 77,
                total: Money::from_cents(4_000),
                tender,
                customer_id: 42,
                note: None,
            };
            let err = complete_pending_sale(&backend.client(), &pending, today())
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::PaymentError);
        }
        assert_eq!(backend.request_count(), 0);
    }
}
