//! Ledger notification port.
//!
//! The accounts service reports every committed balance change through this
//! trait. The production adapter talks HTTP to the transactions service;
//! tests substitute recording or failing doubles.

use crate::dto::CreateTransactionRequest;

/// Error type for ledger notifications.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Transactions service unreachable: {0}")]
    Transport(String),

    #[error("Transactions service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Transactions service returned an unreadable body: {0}")]
    InvalidResponse(String),

    #[error("Transactions service declined the entry")]
    Rejected,
}

/// Port trait for recording a balance change in the ledger.
#[async_trait::async_trait]
pub trait LedgerNotifier: Send + Sync + 'static {
    /// Records one ledger entry. `Ok(())` only when the ledger confirmed it.
    async fn record(&self, entry: &CreateTransactionRequest) -> Result<(), NotifyError>;
}
