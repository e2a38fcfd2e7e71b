//! Ledger repository port.

use crate::domain::{NewTransaction, Transaction};
use crate::error::RepoError;

/// Append-only storage port for the transactions service.
#[async_trait::async_trait]
pub trait LedgerRepository: Send + Sync + 'static {
    /// Appends an entry. Duplicates are stored as separate rows.
    async fn append(&self, entry: NewTransaction) -> Result<Transaction, RepoError>;

    /// Returns at most `limit` entries for `username`, newest first.
    ///
    /// Entries with the same timestamp are ordered by id, newest first.
    async fn latest_by_username(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<Transaction>, RepoError>;
}
