//! # Micropay Application
//!
//! Shared wiring for the `accounts-server` and `transactions-server` binaries:
//! environment configuration and the tracing stack.

pub mod config;
pub mod telemetry;

pub use config::{AccountsConfig, TransactionsConfig};
