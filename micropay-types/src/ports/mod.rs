//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod accounts;
mod ledger;
mod notifier;

pub use accounts::AccountRepository;
pub use ledger::LedgerRepository;
pub use notifier::{LedgerNotifier, NotifyError};
