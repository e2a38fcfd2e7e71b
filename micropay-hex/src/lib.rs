//! # Micropay Hex
//!
//! Application service layer and HTTP adapters for the accounts and
//! transactions services.
//!
//! ## Architecture
//!
//! - `service/` - Application services (orchestrate domain operations)
//! - `inbound/` - HTTP adapters (Axum servers)
//! - `outbound/` - HTTP adapter reporting balance changes to the ledger
//!
//! The services are generic over their ports (`AccountRepository`,
//! `LedgerNotifier`, `LedgerRepository`), allowing different adapters
//! to be injected.

pub mod inbound;
pub mod openapi;
pub mod outbound;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use outbound::HttpLedgerNotifier;
pub use service::{AccountsService, TransactionsService};
