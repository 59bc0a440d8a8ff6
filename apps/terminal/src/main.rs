//! # Tally Terminal Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Terminal                                 │
//! │                                                                         │
//! │  main.rs ────► tokio runtime                                            │
//! │                                                                         │
//! │  lib.rs ─────► CLI parsing, tracing, dispatch                           │
//! │                                                                         │
//! │  commands/ ──► quote, submit_sale, close register, ...                  │
//! │                                                                         │
//! │  state/ ─────► CartState, CheckoutState, TerminalConfig                 │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                tally-api ──► backend REST API                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Setup lives in lib.rs
    tally_terminal::run().await
}
