//! Accounts Application Service

use micropay_repo::security::hash_password;
use micropay_types::{
    AccountAmount, AccountRepository, AccountResponse, Amount, AppError, CreateAccountRequest,
    CreateTransactionRequest, DomainError, LedgerNotifier, NewAccount, RepoError,
    TransactionAction,
};

use super::require_username;

/// Application service for account operations.
///
/// Generic over the storage port `R` and the ledger notification port `N`,
/// both injected at construction.
pub struct AccountsService<R: AccountRepository, N: LedgerNotifier> {
    repo: R,
    notifier: N,
    notify_ledger: bool,
}

impl<R: AccountRepository, N: LedgerNotifier> AccountsService<R, N> {
    /// Creates a new accounts service. Ledger notifications are on.
    pub fn new(repo: R, notifier: N) -> Self {
        Self {
            repo,
            notifier,
            notify_ledger: true,
        }
    }

    /// Turns reporting of balance changes to the ledger on or off.
    pub fn with_ledger_notifications(mut self, enabled: bool) -> Self {
        self.notify_ledger = enabled;
        self
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Account Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a new account with its password hashed at rest.
    #[tracing::instrument(skip(self, req), fields(username = %req.username))]
    pub async fn create_account(&self, req: CreateAccountRequest) -> Result<bool, AppError> {
        require_username(&req.username)?;
        if req.password.trim().is_empty() {
            return Err(DomainError::EmptyField("password").into());
        }

        if self.repo.get_by_username(&req.username).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "Account {} already exists",
                req.username
            )));
        }

        let account = NewAccount::new(
            req.username,
            hash_password(&req.password),
            req.balance,
            req.can_overdraft,
        )?;
        let account = self.repo.create_account(account).await?;

        tracing::info!(account_id = %account.id, "account created");
        Ok(true)
    }

    /// Gets the public view of an account.
    pub async fn get_account_by_username(
        &self,
        username: &str,
    ) -> Result<AccountResponse, AppError> {
        let username = require_username(username)?;
        self.repo
            .get_by_username(username)
            .await?
            .map(AccountResponse::from)
            .ok_or_else(|| account_not_found(username))
    }

    /// Gets the current balance of an account.
    pub async fn get_balance_by_username(&self, username: &str) -> Result<AccountAmount, AppError> {
        let username = require_username(username)?;
        self.repo
            .get_by_username(username)
            .await?
            .map(|account| AccountAmount::new(account.username, account.balance))
            .ok_or_else(|| account_not_found(username))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Balance Changes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Deposits money into an account.
    pub async fn deposit(&self, req: AccountAmount) -> Result<AccountAmount, AppError> {
        self.deposit_or_withdraw(req, TransactionAction::Deposit)
            .await
    }

    /// Withdraws money from an account.
    pub async fn withdraw(&self, req: AccountAmount) -> Result<AccountAmount, AppError> {
        self.deposit_or_withdraw(req, TransactionAction::Withdraw)
            .await
    }

    /// Applies a balance change, then reports it to the ledger.
    ///
    /// The balance change is committed before the ledger is called. When the
    /// ledger cannot be reached the change stays committed and the caller
    /// gets `AppError::LedgerUnavailable`.
    #[tracing::instrument(skip(self, req), fields(username = %req.username, amount = req.amount))]
    pub async fn deposit_or_withdraw(
        &self,
        req: AccountAmount,
        action: TransactionAction,
    ) -> Result<AccountAmount, AppError> {
        let username = require_username(&req.username)?;
        let amount = Amount::new(req.amount)?;

        let account = self
            .repo
            .apply_balance_change(username, action, amount)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => account_not_found(username),
                e => e.into(),
            })?;

        tracing::info!(%action, new_balance = account.balance, "balance updated");

        if self.notify_ledger {
            let entry = CreateTransactionRequest::new(
                &account.username,
                action,
                amount.value(),
                account.balance,
            );
            if let Err(e) = self.notifier.record(&entry).await {
                tracing::warn!(
                    username = %account.username,
                    %action,
                    amount = amount.value(),
                    error = %e,
                    "ledger notification failed, balance change kept"
                );
                return Err(AppError::LedgerUnavailable(e.to_string()));
            }
        }

        Ok(AccountAmount::new(account.username, amount.value()))
    }
}

fn account_not_found(username: &str) -> AppError {
    AppError::NotFound(format!("Account {} not found", username))
}
