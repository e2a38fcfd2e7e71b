//! PostgreSQL repository adapters.

use async_trait::async_trait;
use sqlx::PgPool;

use micropay_types::{
    Account, AccountId, AccountRepository, Amount, LedgerRepository, NewAccount, NewTransaction,
    RepoError, Transaction, TransactionAction, TransactionId,
};

use crate::types::{DbAccount, DbTransaction, map_insert_error};

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL accounts store with row-level locking on balance changes.
pub struct PostgresAccountsRepo {
    pool: PgPool,
}

impl PostgresAccountsRepo {
    /// Creates a new PostgreSQL accounts repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_accounts_pg.sql"),
            "0001",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountsRepo {
    async fn create_account(&self, account: NewAccount) -> Result<Account, RepoError> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO accounts (username, password, balance, created_date, can_overdraft)
               VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.balance)
        .bind(account.created_date)
        .bind(account.can_overdraft)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &account.username))?;

        Ok(account.into_account(AccountId::new(id)))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>, RepoError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"SELECT id, username, password, balance, created_date, can_overdraft
               FROM accounts WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(row.map(Account::from))
    }

    async fn apply_balance_change(
        &self,
        username: &str,
        action: TransactionAction,
        amount: Amount,
    ) -> Result<Account, RepoError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        // Lock the row so concurrent changes to one account serialize.
        let row: Option<DbAccount> = sqlx::query_as(
            r#"SELECT id, username, password, balance, created_date, can_overdraft
               FROM accounts WHERE username = $1 FOR UPDATE"#,
        )
        .bind(username)
        .fetch_optional(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let mut account = Account::from(row.ok_or(RepoError::NotFound)?);
        account.apply(action, amount)?;

        sqlx::query(r#"UPDATE accounts SET balance = $1 WHERE id = $2"#)
            .bind(account.balance)
            .bind(account.id.value())
            .execute(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(account)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL append-only ledger store.
pub struct PostgresLedgerRepo {
    pool: PgPool,
}

impl PostgresLedgerRepo {
    /// Creates a new PostgreSQL ledger repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0002_create_transactions_pg.sql"),
            "0002",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LedgerRepository for PostgresLedgerRepo {
    async fn append(&self, entry: NewTransaction) -> Result<Transaction, RepoError> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO transactions (username, action, amount, created_date, new_balance)
               VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(&entry.username)
        .bind(entry.action.as_str())
        .bind(entry.amount.value())
        .bind(entry.created_date)
        .bind(entry.new_balance)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(entry.into_transaction(TransactionId::new(id)))
    }

    async fn latest_by_username(
        &self,
        username: &str,
        limit: i64,
    ) -> Result<Vec<Transaction>, RepoError> {
        let rows: Vec<DbTransaction> = sqlx::query_as(
            r#"SELECT id, username, action, amount, created_date, new_balance
               FROM transactions WHERE username = $1
               ORDER BY created_date DESC, id DESC
               LIMIT $2"#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }
}
