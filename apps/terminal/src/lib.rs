//! # Tally Terminal Library
//!
//! Orchestration layer between the operator and the backend.
//!
//! ## Module Structure
//! ```text
//! tally_terminal/
//! ├── lib.rs            ◄─── You are here (run, tracing)
//! ├── cli.rs            ◄─── clap definitions, dispatch, text output
//! ├── error.rs          ◄─── CommandError {code, message}
//! ├── state/
//! │   ├── cart.rs       ◄─── CartState + cart file loading
//! │   ├── checkout.rs   ◄─── CheckoutState (customer, discounts, loyalty)
//! │   └── config.rs     ◄─── TerminalConfig (terminal.toml + env)
//! └── commands/
//!     ├── checkout.rs   ◄─── coupon, loyalty, quote, submit_sale
//!     └── register.rs   ◄─── status, cash movement, close, Z-report
//! ```
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Initialize tracing (logging)
//! 3. Load configuration (defaults → terminal.toml → env)
//! 4. Build the API client
//! 5. Run the command

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

pub use error::{CommandError, CommandResult, ErrorCode};

/// Parses the command line and runs it.
pub async fn run() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing();

    match cli::execute(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(code = ?err.code, "Command failed: {}", err.message);
            eprintln!("error: {}", err.message);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally=trace` - Show trace for tally crates only
/// - Default: INFO, DEBUG for tally crates
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
