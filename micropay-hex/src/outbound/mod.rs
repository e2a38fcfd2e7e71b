//! Outbound adapters.

mod ledger;

pub use ledger::HttpLedgerNotifier;
