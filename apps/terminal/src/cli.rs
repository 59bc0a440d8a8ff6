//! # Command Line Interface
//!
//! ```bash
//! # Price a cart
//! tally quote --cart cart.json --coupon SAVE10 --customer 42 --points 150
//!
//! # Ring it up
//! tally sale --cart cart.json --method split --cash 60.01 --card 39.99
//! tally sale --cart cart.json --method credit --customer 42 --due-date 2024-07-01
//!
//! # Pay a pending sale
//! tally complete --sale-id 77 --total 40 --method cash --paid 50
//!
//! # Register
//! tally register status
//! tally register movement --type out --amount 15 --reason "Supplier payout"
//! tally register close --counted 365 --note "Short after recount" --confirm
//! tally register z-report
//! ```
//!
//! Cart files are a JSON array of lines:
//! `[{"product_id": 7, "name": "Tea", "quantity": 2, "unit_price": 12.50}]`

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use tally_api::dto::{CashMovementRecord, ZReport};
use tally_api::ApiClient;
use tally_core::{CashMovementKind, Money, PaymentMethod, PriceBreakdown, Tender};

use crate::commands::{self, CloseOutcome, PendingPayment, RegisterStatus, SaleReceipt};
use crate::error::{CommandError, CommandResult};
use crate::state::{load_cart_file, CartState, CheckoutState, TerminalConfig};

/// Exit code when a register close is waiting for `--confirm`.
pub const EXIT_NEEDS_CONFIRMATION: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Tally POS checkout and register terminal")]
pub struct Cli {
    /// Config file (defaults to terminal.toml in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a cart without submitting it
    Quote {
        #[command(flatten)]
        checkout: CheckoutArgs,
    },
    /// Submit a sale
    Sale {
        #[command(flatten)]
        checkout: CheckoutArgs,

        #[command(flatten)]
        tender: TenderArgs,

        /// Note stored with the sale
        #[arg(long)]
        note: Option<String>,
    },
    /// Pay a pending sale
    Complete {
        #[arg(long)]
        sale_id: i64,

        /// Amount still owed on the sale
        #[arg(long)]
        total: Money,

        #[arg(long, default_value_t = tally_core::WALK_IN_CUSTOMER_ID)]
        customer: i64,

        #[command(flatten)]
        tender: TenderArgs,

        #[arg(long)]
        note: Option<String>,
    },
    /// Register session commands
    Register {
        #[command(subcommand)]
        action: RegisterAction,
    },
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Cart file (JSON array of lines)
    #[arg(long)]
    pub cart: PathBuf,

    /// Manual discount
    #[arg(long)]
    pub discount: Option<Money>,

    /// Coupon code to validate and apply
    #[arg(long)]
    pub coupon: Option<String>,

    /// Customer id (defaults to the configured default customer)
    #[arg(long)]
    pub customer: Option<i64>,

    /// Loyalty points to redeem
    #[arg(long, default_value_t = 0)]
    pub points: i64,
}

#[derive(Debug, Args)]
pub struct TenderArgs {
    /// cash, card, online, credit or split
    #[arg(long)]
    pub method: PaymentMethod,

    /// Amount handed over (defaults to the exact total)
    #[arg(long)]
    pub paid: Option<Money>,

    /// Cash part of a split payment
    #[arg(long)]
    pub cash: Option<Money>,

    /// Card part of a split payment
    #[arg(long)]
    pub card: Option<Money>,

    /// Due date of a credit sale (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: Option<NaiveDate>,
}

impl TenderArgs {
    pub fn tender(&self) -> CommandResult<Tender> {
        let tender = match self.method {
            PaymentMethod::Cash => Tender::Cash {
                tendered: self.paid,
            },
            PaymentMethod::Card => Tender::Card { amount: self.paid },
            PaymentMethod::Online => Tender::Online { amount: self.paid },
            PaymentMethod::Split => Tender::Split {
                cash: self
                    .cash
                    .ok_or_else(|| CommandError::validation("--cash is required for split"))?,
                card: self
                    .card
                    .ok_or_else(|| CommandError::validation("--card is required for split"))?,
            },
            PaymentMethod::Credit => Tender::Credit {
                due_date: self.due_date,
            },
        };
        Ok(tender)
    }
}

#[derive(Debug, Subcommand)]
pub enum RegisterAction {
    /// Show the open session and expected drawer cash
    Status,
    /// Record cash added to or taken from the drawer
    Movement {
        /// in or out
        #[arg(long = "type")]
        kind: CashMovementKind,

        #[arg(long)]
        amount: Money,

        #[arg(long)]
        reason: String,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Close the register with the counted drawer balance
    Close {
        #[arg(long)]
        counted: Money,

        #[arg(long)]
        note: Option<String>,

        /// Close even if the drawer is over or short
        #[arg(long)]
        confirm: bool,
    },
    /// End-of-day summary
    ZReport,
}

// =============================================================================
// Execution
// =============================================================================

/// Runs a parsed command line.
pub async fn execute(cli: Cli) -> CommandResult<ExitCode> {
    let config = TerminalConfig::load(cli.config.as_deref())
        .map_err(|e| CommandError::config(e.to_string()))?;
    let api = ApiClient::new(&config.api)?;
    let out = Output {
        config: &config,
        json: cli.json,
    };
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::Quote { checkout } => {
            let (cart, state) = prepare_checkout(&api, &config, &checkout).await?;
            let breakdown = commands::quote(&cart, &state)?;
            out.print(&breakdown, render_breakdown)?;
        }
        Command::Sale {
            checkout,
            tender,
            note,
        } => {
            let tender = tender.tender()?;
            let (cart, state) = prepare_checkout(&api, &config, &checkout).await?;
            let receipt =
                commands::submit_sale(&api, &cart, &state, &tender, note.as_deref(), today)
                    .await?;
            out.print(&receipt, render_receipt)?;
        }
        Command::Complete {
            sale_id,
            total,
            customer,
            tender,
            note,
        } => {
            let pending = PendingPayment {
                sale_id,
                total,
                tender: tender.tender()?,
                customer_id: customer,
                note: note.as_deref(),
            };
            let sale = commands::complete_pending_sale(&api, &pending, today).await?;
            out.print(&sale, |config, sale| {
                format!(
                    "Sale {} completed ({})",
                    sale.label(),
                    config.format_currency(sale.total_amount)
                )
            })?;
        }
        Command::Register { action } => return execute_register(&api, &out, action).await,
    }

    Ok(ExitCode::SUCCESS)
}

async fn execute_register(
    api: &ApiClient,
    out: &Output<'_>,
    action: RegisterAction,
) -> CommandResult<ExitCode> {
    match action {
        RegisterAction::Status => {
            let status = commands::load_session(api).await?;
            out.print(&status, render_status)?;
        }
        RegisterAction::Movement {
            kind,
            amount,
            reason,
            notes,
        } => {
            let record =
                commands::record_cash_movement(api, kind, amount, &reason, notes.as_deref())
                    .await?;
            out.print(&record, render_movement)?;
        }
        RegisterAction::Close {
            counted,
            note,
            confirm,
        } => {
            let mut flow = commands::begin_close(api).await?;
            let mut outcome =
                commands::submit_close(api, &mut flow, counted, note.as_deref()).await?;

            if confirm && matches!(outcome, CloseOutcome::NeedsConfirmation { .. }) {
                outcome = commands::confirm_close(api, &mut flow, note.as_deref()).await?;
            }

            out.print(&outcome, render_close)?;
            if matches!(outcome, CloseOutcome::NeedsConfirmation { .. }) {
                return Ok(ExitCode::from(EXIT_NEEDS_CONFIRMATION));
            }
        }
        RegisterAction::ZReport => {
            let report = commands::z_report(api).await?;
            out.print(&report, render_z_report)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads the cart and applies every checkout option given on the command
/// line. Coupon and loyalty lookups go to the backend.
async fn prepare_checkout(
    api: &ApiClient,
    config: &TerminalConfig,
    args: &CheckoutArgs,
) -> CommandResult<(CartState, CheckoutState)> {
    let cart = CartState::with_contents(load_cart_file(&args.cart)?);
    let checkout = CheckoutState::new(config.checkout.default_customer_id);

    if let Some(customer_id) = args.customer {
        commands::select_customer(&checkout, customer_id)?;
    }
    if let Some(discount) = args.discount {
        commands::set_manual_discount(&checkout, discount)?;
    }
    if let Some(code) = &args.coupon {
        commands::apply_coupon(api, &cart, &checkout, code).await?;
    }
    if args.points != 0 {
        commands::load_loyalty(api, &checkout).await?;
        commands::redeem_points(&checkout, args.points)?;
    }

    Ok((cart, checkout))
}

// =============================================================================
// Output
// =============================================================================

struct Output<'a> {
    config: &'a TerminalConfig,
    json: bool,
}

impl Output<'_> {
    fn print<T, F>(&self, value: &T, render: F) -> CommandResult<()>
    where
        T: Serialize,
        F: FnOnce(&TerminalConfig, &T) -> String,
    {
        if self.json {
            let text = serde_json::to_string_pretty(value)
                .map_err(|e| CommandError::internal(e.to_string()))?;
            println!("{}", text);
        } else {
            println!("{}", render(self.config, value));
        }
        Ok(())
    }
}

fn row(label: &str, value: String) -> String {
    format!("{:<18}{:>14}", label, value)
}

pub fn render_breakdown(config: &TerminalConfig, b: &PriceBreakdown) -> String {
    let money = |m: Money| config.format_currency(m);
    let mut lines = vec![row("Subtotal", money(b.subtotal))];

    if !b.manual_discount.is_zero() {
        lines.push(row("Discount", money(-b.manual_discount)));
    }
    if !b.coupon_discount.is_zero() {
        lines.push(row("Coupon", money(-b.coupon_discount)));
    }
    if b.loyalty_points_used > 0 {
        lines.push(row(
            &format!("Loyalty ({} pts)", b.loyalty_points_used),
            money(-b.loyalty_discount),
        ));
    }
    lines.push(row("Total", money(b.final_total)));
    lines.join("\n")
}

pub fn render_receipt(config: &TerminalConfig, receipt: &SaleReceipt) -> String {
    let money = |m: Money| config.format_currency(m);
    let p = &receipt.payment;

    let mut lines = vec![
        config.store.name.clone(),
        format!("Sale {}", receipt.sale.label()),
        render_breakdown(config, &receipt.breakdown),
        row(&format!("Paid ({})", p.method), money(p.amount_paid)),
    ];

    if let (Some(cash), Some(card)) = (p.cash_portion, p.card_portion) {
        lines.push(row("  cash", money(cash)));
        lines.push(row("  card", money(card)));
    }
    if !p.change_due.is_zero() {
        lines.push(row("Change", money(p.change_due)));
    }
    if let Some(due) = p.due_date {
        lines.push(row("Outstanding", money(p.outstanding)));
        lines.push(row("Due", due.to_string()));
    }
    lines.join("\n")
}

pub fn render_status(config: &TerminalConfig, status: &RegisterStatus) -> String {
    let money = |m: Money| config.format_currency(m);
    let s = &status.session;

    [
        format!(
            "Register session {} ({})",
            s.id,
            s.cashier_name.as_deref().unwrap_or("unknown cashier")
        ),
        row("Opening balance", money(s.opening_balance)),
        row("Cash sales", money(s.cash_sales_total)),
        row("Card sales", money(s.card_sales_total)),
        row("Cash in", money(s.total_cash_in)),
        row("Cash out", money(-s.total_cash_out)),
        row("Expected cash", money(status.expected_cash)),
    ]
    .join("\n")
}

fn render_movement(config: &TerminalConfig, record: &CashMovementRecord) -> String {
    format!(
        "Cash {} of {} recorded",
        record.kind,
        config.format_currency(record.amount)
    )
}

pub fn render_close(config: &TerminalConfig, outcome: &CloseOutcome) -> String {
    let money = |m: Money| config.format_currency(m);

    match outcome {
        CloseOutcome::NeedsConfirmation { reconciliation: r } => [
            row("Expected cash", money(r.expected_cash)),
            row("Counted", money(r.counted)),
            row(
                &format!("Drawer {}", r.status.as_str()),
                money(r.difference.abs()),
            ),
            "Recount, or run again with --confirm to close anyway.".to_string(),
        ]
        .join("\n"),
        CloseOutcome::Closed {
            reconciliation: r, ..
        } => format!(
            "Register closed: counted {}, expected {} ({})",
            money(r.counted),
            money(r.expected_cash),
            r.status.as_str()
        ),
    }
}

fn render_z_report(config: &TerminalConfig, report: &ZReport) -> String {
    let money = |m: Money| config.format_currency(m);

    let mut lines = vec![format!(
        "Z-Report {}",
        report.date.map(|d| d.to_string()).unwrap_or_default()
    )];
    lines.push(row("Transactions", report.transaction_count.to_string()));
    lines.push(row("Total sales", money(report.total_sales)));
    lines.push(row("Cash", money(report.cash_total)));
    lines.push(row("Card", money(report.card_total)));
    lines.push(row("Online", money(report.online_total)));
    lines.push(row("Credit", money(report.credit_total)));
    lines.push(row("Refunds", money(-report.refunds_total)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tally_core::register::{Reconciliation, ReconciliationStatus};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_split_sale() {
        let cli = Cli::try_parse_from([
            "tally", "sale", "--cart", "cart.json", "--method", "split", "--cash", "60.01",
            "--card", "39.99",
        ])
        .unwrap();

        let Command::Sale { tender, .. } = cli.command else {
            panic!("expected sale");
        };
        assert_eq!(
            tender.tender().unwrap(),
            Tender::Split {
                cash: Money::from_cents(6_001),
                card: Money::from_cents(3_999),
            }
        );
    }

    #[test]
    fn test_split_requires_both_parts() {
        let cli = Cli::try_parse_from([
            "tally", "sale", "--cart", "cart.json", "--method", "split", "--cash", "60",
        ])
        .unwrap();

        let Command::Sale { tender, .. } = cli.command else {
            panic!("expected sale");
        };
        assert_eq!(
            tender.tender().unwrap_err().message,
            "--card is required for split"
        );
    }

    #[test]
    fn test_parse_register_close() {
        let cli = Cli::try_parse_from([
            "tally", "--json", "register", "close", "--counted", "365", "--confirm",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Register {
                action: RegisterAction::Close {
                    counted, confirm, ..
                },
            } => {
                assert_eq!(counted.cents(), 36_500);
                assert!(confirm);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_method() {
        let result = Cli::try_parse_from([
            "tally", "sale", "--cart", "cart.json", "--method", "cheque",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_breakdown() {
        let config = TerminalConfig::default();
        let text = render_breakdown(
            &config,
            &PriceBreakdown {
                subtotal: Money::from_cents(5_000),
                manual_discount: Money::zero(),
                coupon_discount: Money::from_cents(1_000),
                loyalty_points_used: 120,
                loyalty_discount: Money::from_cents(1_200),
                final_total: Money::from_cents(2_800),
            },
        );

        assert!(text.contains("Coupon"));
        assert!(text.contains("-$10.00"));
        assert!(text.contains("Loyalty (120 pts)"));
        assert!(text.ends_with("$28.00"));
        assert!(!text.contains("Discount"));
    }

    #[test]
    fn test_render_close_needs_confirmation() {
        let config = TerminalConfig::default();
        let outcome = CloseOutcome::NeedsConfirmation {
            reconciliation: Reconciliation {
                expected_cash: Money::from_cents(37_000),
                counted: Money::from_cents(36_500),
                difference: Money::from_cents(-500),
                status: ReconciliationStatus::Short,
            },
        };

        let text = render_close(&config, &outcome);
        assert!(text.contains("Drawer short"));
        assert!(text.contains("$5.00"));
        assert!(text.contains("--confirm"));
    }
}
