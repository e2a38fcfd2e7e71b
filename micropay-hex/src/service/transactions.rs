//! Transactions (ledger) Application Service

use micropay_types::{
    Amount, AppError, CreateTransactionRequest, DomainError, LATEST_TRANSACTIONS_LIMIT,
    LedgerRepository, NewTransaction, TransactionAction, TransactionDto,
};

use super::require_username;

/// Application service for the append-only ledger.
pub struct TransactionsService<L: LedgerRepository> {
    repo: L,
}

impl<L: LedgerRepository> TransactionsService<L> {
    /// Creates a new ledger service with the given repository.
    pub fn new(repo: L) -> Self {
        Self { repo }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &L {
        &self.repo
    }

    /// Appends a ledger entry stamped with the current time.
    ///
    /// Entries are not deduplicated; a repeated request is a new row.
    #[tracing::instrument(skip(self, req), fields(username = %req.username, action = %req.action))]
    pub async fn create_transaction(&self, req: CreateTransactionRequest) -> Result<bool, AppError> {
        require_username(&req.username)?;
        if req.action.trim().is_empty() {
            return Err(DomainError::EmptyField("action").into());
        }
        let action: TransactionAction = req.action.parse()?;
        let amount = Amount::new(req.amount)?;
        if !req.new_balance.is_finite() {
            return Err(
                DomainError::ValidationError("newBalance must be a finite number".into()).into(),
            );
        }

        let entry = NewTransaction::new(req.username, action, amount, req.new_balance)?;
        let stored = self.repo.append(entry).await?;

        tracing::debug!(transaction_id = %stored.id, "ledger entry appended");
        Ok(true)
    }

    /// Lists the newest entries for `username`, newest first.
    ///
    /// Unknown usernames yield an empty list.
    pub async fn latest_transactions_by_username(
        &self,
        username: &str,
    ) -> Result<Vec<TransactionDto>, AppError> {
        let username = require_username(username)?;
        let entries = self
            .repo
            .latest_by_username(username, LATEST_TRANSACTIONS_LIMIT)
            .await?;

        Ok(entries.into_iter().map(TransactionDto::from).collect())
    }
}
