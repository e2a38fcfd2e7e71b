//! AccountsService and TransactionsService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use micropay_repo::security::verify_password;
    use micropay_types::{
        Account, AccountAmount, AccountId, AccountRepository, Amount, AppError,
        CreateAccountRequest, CreateTransactionRequest, LedgerNotifier, LedgerRepository,
        NewAccount, NewTransaction, NotifyError, RepoError, Transaction, TransactionAction,
        TransactionId,
    };

    use crate::{AccountsService, TransactionsService};

    // ── Test doubles ────────────────────────────────────────────────────────

    /// Simple in-memory accounts store for testing the service layer.
    #[derive(Default)]
    pub struct MockAccountsRepo {
        accounts: Mutex<HashMap<String, Account>>,
        balance_changes: AtomicUsize,
    }

    impl MockAccountsRepo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn balance_changes(&self) -> usize {
            self.balance_changes.load(Ordering::SeqCst)
        }

        pub fn balance_of(&self, username: &str) -> Option<f64> {
            self.accounts
                .lock()
                .unwrap()
                .get(username)
                .map(|a| a.balance)
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountsRepo {
        async fn create_account(&self, account: NewAccount) -> Result<Account, RepoError> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(&account.username) {
                return Err(RepoError::Conflict(account.username));
            }
            let account = account.into_account(AccountId::new(accounts.len() as i64 + 1));
            accounts.insert(account.username.clone(), account.clone());
            Ok(account)
        }

        async fn get_by_username(&self, username: &str) -> Result<Option<Account>, RepoError> {
            Ok(self.accounts.lock().unwrap().get(username).cloned())
        }

        async fn apply_balance_change(
            &self,
            username: &str,
            action: TransactionAction,
            amount: Amount,
        ) -> Result<Account, RepoError> {
            self.balance_changes.fetch_add(1, Ordering::SeqCst);
            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts.get_mut(username).ok_or(RepoError::NotFound)?;
            account.apply(action, amount)?;
            Ok(account.clone())
        }
    }

    /// In-memory ledger store.
    #[derive(Default)]
    pub struct MockLedgerRepo {
        entries: Mutex<Vec<Transaction>>,
    }

    #[async_trait]
    impl LedgerRepository for MockLedgerRepo {
        async fn append(&self, entry: NewTransaction) -> Result<Transaction, RepoError> {
            let mut entries = self.entries.lock().unwrap();
            let tx = entry.into_transaction(TransactionId::new(entries.len() as i64 + 1));
            entries.push(tx.clone());
            Ok(tx)
        }

        async fn latest_by_username(
            &self,
            username: &str,
            limit: i64,
        ) -> Result<Vec<Transaction>, RepoError> {
            let mut matching: Vec<Transaction> = self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.username == username)
                .cloned()
                .collect();
            matching.sort_by(|a, b| {
                b.created_date
                    .cmp(&a.created_date)
                    .then(b.id.value().cmp(&a.id.value()))
            });
            matching.truncate(limit as usize);
            Ok(matching)
        }
    }

    /// Notifier that remembers every entry it was given.
    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        entries: Arc<Mutex<Vec<CreateTransactionRequest>>>,
    }

    impl RecordingNotifier {
        pub fn entries(&self) -> Vec<CreateTransactionRequest> {
            self.entries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LedgerNotifier for RecordingNotifier {
        async fn record(&self, entry: &CreateTransactionRequest) -> Result<(), NotifyError> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    /// Notifier whose peer is always down.
    pub struct FailingNotifier;

    #[async_trait]
    impl LedgerNotifier for FailingNotifier {
        async fn record(&self, _entry: &CreateTransactionRequest) -> Result<(), NotifyError> {
            Err(NotifyError::Transport("connection refused".into()))
        }
    }

    /// Notifier that hands entries straight to a ledger service.
    pub struct InProcessNotifier {
        ledger: Arc<TransactionsService<MockLedgerRepo>>,
    }

    #[async_trait]
    impl LedgerNotifier for InProcessNotifier {
        async fn record(&self, entry: &CreateTransactionRequest) -> Result<(), NotifyError> {
            match self.ledger.create_transaction(entry.clone()).await {
                Ok(true) => Ok(()),
                Ok(false) => Err(NotifyError::Rejected),
                Err(e) => Err(NotifyError::Status {
                    status: 400,
                    message: e.to_string(),
                }),
            }
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────────

    fn create_req(username: &str, balance: f64, can_overdraft: bool) -> CreateAccountRequest {
        CreateAccountRequest {
            username: username.to_string(),
            password: "secret".to_string(),
            balance,
            can_overdraft,
        }
    }

    async fn service_with(
        username: &str,
        balance: f64,
        can_overdraft: bool,
    ) -> (
        AccountsService<MockAccountsRepo, RecordingNotifier>,
        RecordingNotifier,
    ) {
        let notifier = RecordingNotifier::default();
        let service = AccountsService::new(MockAccountsRepo::new(), notifier.clone());
        service
            .create_account(create_req(username, balance, can_overdraft))
            .await
            .unwrap();
        (service, notifier)
    }

    // ── CreateAccount ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_account_success() {
        let service = AccountsService::new(MockAccountsRepo::new(), RecordingNotifier::default());

        let created = service
            .create_account(create_req("alice", 100.0, true))
            .await
            .unwrap();
        assert!(created);

        let account = service.get_account_by_username("alice").await.unwrap();
        assert_eq!(account.balance, 100.0);
        assert!(account.can_overdraft);
    }

    #[tokio::test]
    async fn test_create_account_hashes_password() {
        let service = AccountsService::new(MockAccountsRepo::new(), RecordingNotifier::default());
        service
            .create_account(create_req("alice", 0.0, false))
            .await
            .unwrap();

        let stored = service
            .repo()
            .get_by_username("alice")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "secret");
        assert!(verify_password("secret", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_create_account_duplicate_fails() {
        let (service, _) = service_with("alice", 100.0, false).await;

        let result = service.create_account(create_req("alice", 5.0, true)).await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
        assert_eq!(service.repo().balance_of("alice"), Some(100.0));
    }

    #[tokio::test]
    async fn test_create_account_blank_fields_fail() {
        let service = AccountsService::new(MockAccountsRepo::new(), RecordingNotifier::default());

        let blank_user = service.create_account(create_req("   ", 0.0, false)).await;
        assert!(matches!(blank_user, Err(AppError::BadRequest(_))));

        let mut req = create_req("alice", 0.0, false);
        req.password = String::new();
        let blank_password = service.create_account(req).await;
        assert!(matches!(blank_password, Err(AppError::BadRequest(_))));
    }

    // ── Lookups ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_balance_by_username() {
        let (service, _) = service_with("alice", 42.0, false).await;

        let balance = service.get_balance_by_username("alice").await.unwrap();

        assert_eq!(balance, AccountAmount::new("alice", 42.0));
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let service = AccountsService::new(MockAccountsRepo::new(), RecordingNotifier::default());

        let account = service.get_account_by_username("ghost").await;
        let balance = service.get_balance_by_username("ghost").await;

        assert!(matches!(account, Err(AppError::NotFound(_))));
        assert!(matches!(balance, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_lookup_empty_username_fails() {
        let service = AccountsService::new(MockAccountsRepo::new(), RecordingNotifier::default());

        let result = service.get_balance_by_username("").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    // ── DepositOrWithdraw ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_deposit_success_notifies_ledger() {
        let (service, notifier) = service_with("alice", 100.0, false).await;

        let applied = service
            .deposit(AccountAmount::new("alice", 50.0))
            .await
            .unwrap();

        assert_eq!(applied, AccountAmount::new("alice", 50.0));
        assert_eq!(service.repo().balance_of("alice"), Some(150.0));
        assert_eq!(
            notifier.entries(),
            vec![CreateTransactionRequest::new(
                "alice",
                TransactionAction::Deposit,
                50.0,
                150.0
            )]
        );
    }

    #[tokio::test]
    async fn test_withdraw_with_overdraft() {
        let (service, notifier) = service_with("TOCHANGE", 100.0, true).await;

        service
            .withdraw(AccountAmount::new("TOCHANGE", 150.0))
            .await
            .unwrap();

        assert_eq!(service.repo().balance_of("TOCHANGE"), Some(-50.0));
        let entries = notifier.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "WITHDRAW");
        assert_eq!(entries[0].amount, 150.0);
        assert_eq!(entries[0].new_balance, -50.0);
    }

    #[tokio::test]
    async fn test_withdraw_without_overdraft_fails() {
        let (service, notifier) = service_with("TOCHANGE", 100.0, false).await;

        let result = service
            .withdraw(AccountAmount::new("TOCHANGE", 150.0))
            .await;

        assert!(matches!(
            result,
            Err(AppError::OverdraftNotAllowed {
                balance,
                requested,
            }) if balance == 100.0 && requested == 150.0
        ));
        assert_eq!(service.repo().balance_of("TOCHANGE"), Some(100.0));
        assert!(notifier.entries().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_amount_never_reaches_storage() {
        let (service, notifier) = service_with("alice", 100.0, false).await;

        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = service.deposit(AccountAmount::new("alice", amount)).await;
            assert!(matches!(result, Err(AppError::BadRequest(_))));
        }

        assert_eq!(service.repo().balance_changes(), 0);
        assert!(notifier.entries().is_empty());
    }

    #[tokio::test]
    async fn test_balance_change_unknown_account() {
        let service = AccountsService::new(MockAccountsRepo::new(), RecordingNotifier::default());

        let result = service.deposit(AccountAmount::new("ghost", 10.0)).await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg.contains("ghost")));
    }

    #[tokio::test]
    async fn test_ledger_failure_keeps_balance_change() {
        let service = AccountsService::new(MockAccountsRepo::new(), FailingNotifier);
        service
            .create_account(create_req("alice", 100.0, false))
            .await
            .unwrap();

        let result = service.deposit(AccountAmount::new("alice", 25.0)).await;

        assert!(matches!(result, Err(AppError::LedgerUnavailable(_))));
        assert_eq!(service.repo().balance_of("alice"), Some(125.0));
    }

    #[tokio::test]
    async fn test_notifications_disabled() {
        let notifier = RecordingNotifier::default();
        let service = AccountsService::new(MockAccountsRepo::new(), notifier.clone())
            .with_ledger_notifications(false);
        service
            .create_account(create_req("alice", 100.0, false))
            .await
            .unwrap();

        service
            .withdraw(AccountAmount::new("alice", 40.0))
            .await
            .unwrap();

        assert_eq!(service.repo().balance_of("alice"), Some(60.0));
        assert!(notifier.entries().is_empty());
    }

    #[tokio::test]
    async fn test_balance_change_lands_in_ledger() {
        let ledger = Arc::new(TransactionsService::new(MockLedgerRepo::default()));
        let service = AccountsService::new(
            MockAccountsRepo::new(),
            InProcessNotifier {
                ledger: ledger.clone(),
            },
        );
        service
            .create_account(create_req("alice", 100.0, true))
            .await
            .unwrap();

        service
            .withdraw(AccountAmount::new("alice", 150.0))
            .await
            .unwrap();

        let entries = ledger
            .latest_transactions_by_username("alice")
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, TransactionAction::Withdraw);
        assert_eq!(entries[0].amount, 150.0);
        assert_eq!(entries[0].new_balance, -50.0);
    }

    // ── Ledger ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_transaction_success() {
        let service = TransactionsService::new(MockLedgerRepo::default());

        let created = service
            .create_transaction(CreateTransactionRequest::new(
                "alice",
                TransactionAction::Deposit,
                10.0,
                110.0,
            ))
            .await
            .unwrap();

        assert!(created);
    }

    #[tokio::test]
    async fn test_create_transaction_invalid_input() {
        let service = TransactionsService::new(MockLedgerRepo::default());
        let valid = CreateTransactionRequest::new("alice", TransactionAction::Deposit, 10.0, 110.0);

        let cases = [
            CreateTransactionRequest {
                username: String::new(),
                ..valid.clone()
            },
            CreateTransactionRequest {
                action: String::new(),
                ..valid.clone()
            },
            CreateTransactionRequest {
                action: "TRANSFER".into(),
                ..valid.clone()
            },
            CreateTransactionRequest {
                amount: 0.0,
                ..valid.clone()
            },
            CreateTransactionRequest {
                amount: -5.0,
                ..valid.clone()
            },
        ];

        for req in cases {
            let result = service.create_transaction(req).await;
            assert!(matches!(result, Err(AppError::BadRequest(_))));
        }
        assert!(service.repo().entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_transactions_capped_and_ordered() {
        let service = TransactionsService::new(MockLedgerRepo::default());
        let base = Utc::now();

        for i in 0..12 {
            let entry = NewTransaction::at(
                "alice".into(),
                TransactionAction::Deposit,
                Amount::new(1.0 + i as f64).unwrap(),
                0.0,
                base + Duration::seconds(i),
            )
            .unwrap();
            service.repo().append(entry).await.unwrap();
        }

        let latest = service
            .latest_transactions_by_username("alice")
            .await
            .unwrap();

        assert_eq!(latest.len(), 10);
        assert_eq!(latest[0].amount, 12.0);
        for pair in latest.windows(2) {
            assert!(pair[0].created_date > pair[1].created_date);
        }
    }

    #[tokio::test]
    async fn test_latest_transactions_unknown_user_is_empty() {
        let service = TransactionsService::new(MockLedgerRepo::default());

        let latest = service
            .latest_transactions_by_username("nobody")
            .await
            .unwrap();

        assert!(latest.is_empty());
    }
}
