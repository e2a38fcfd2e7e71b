//! Accounts repository port.
//!
//! Adapters (Postgres, SQLite, in-memory test doubles) implement this trait
//! for the store owned by the accounts service.

use crate::domain::{Account, Amount, NewAccount, TransactionAction};
use crate::error::RepoError;

/// Storage port for account records.
#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Stores a new account.
    ///
    /// Returns `RepoError::Conflict` when the username is already taken.
    async fn create_account(&self, account: NewAccount) -> Result<Account, RepoError>;

    /// Gets an account by its unique username.
    async fn get_by_username(&self, username: &str) -> Result<Option<Account>, RepoError>;

    /// Applies a deposit or withdrawal and persists the new balance.
    ///
    /// The read, the overdraft check (`Account::apply`) and the write happen
    /// inside one storage transaction. Returns the updated account,
    /// `RepoError::NotFound` for an unknown username, or the domain error
    /// when the overdraft rule rejects the change.
    async fn apply_balance_change(
        &self,
        username: &str,
        action: TransactionAction,
        amount: Amount,
    ) -> Result<Account, RepoError>;
}
