//! SQLite repository adapters.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use micropay_types::{
    Account, AccountId, AccountRepository, Amount, LedgerRepository, NewAccount, NewTransaction,
    RepoError, Transaction, TransactionAction, TransactionId,
};

use crate::types::{DbAccount, DbTransaction, map_insert_error};

// ─────────────────────────────────────────────────────────────────────────────
// Connection & migrations
// ─────────────────────────────────────────────────────────────────────────────

/// Opens a pool for `database_url`, creating the file and its directory if needed.
async fn open_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    // Ensure on-disk SQLite target directory exists (no-op for in-memory).
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        if path != ":memory:" {
            let p = std::path::Path::new(path);
            if let Some(parent) = p.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // Each connection to an in-memory database gets its own empty database,
    // so the pool must hold exactly one connection and never recycle it.
    let pool = if database_url.contains(":memory:") || database_url.contains("mode=memory") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePool::connect_with(options).await?
    };

    Ok(pool)
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &SqlitePool, sql: &str, name: &str) -> anyhow::Result<()> {
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

/// Fixed-width timestamps keep lexical order equal to chronological order.
fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite store for the accounts service.
pub struct SqliteAccountsRepo {
    pool: SqlitePool,
}

impl SqliteAccountsRepo {
    /// Creates a new SQLite accounts repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = open_pool(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_accounts.sql"),
            "0001",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountsRepo {
    async fn create_account(&self, account: NewAccount) -> Result<Account, RepoError> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO accounts (username, password, balance, created_date, can_overdraft)
               VALUES (?, ?, ?, ?, ?) RETURNING id"#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.balance)
        .bind(timestamp(&account.created_date))
        .bind(account.can_overdraft)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &account.username))?;

        Ok(account.into_account(AccountId::new(id)))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>, RepoError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"SELECT id, username, password, balance, created_date, can_overdraft
               FROM accounts WHERE username = ?"#,
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

        let row: Option<DbAccount> = sqlx::query_as(
            r#"SELECT id, username, password, balance, created_date, can_overdraft
               FROM accounts WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let mut account = Account::from(row.ok_or(RepoError::NotFound)?);
        account.apply(action, amount)?;

        sqlx::query(r#"UPDATE accounts SET balance = ? WHERE id = ?"#)
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

/// SQLite store for the transactions service.
pub struct SqliteLedgerRepo {
    pool: SqlitePool,
}

impl SqliteLedgerRepo {
    /// Creates a new SQLite ledger repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = open_pool(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0002_create_transactions.sql"),
            "0002",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LedgerRepository for SqliteLedgerRepo {
    async fn append(&self, entry: NewTransaction) -> Result<Transaction, RepoError> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO transactions (username, action, amount, created_date, new_balance)
               VALUES (?, ?, ?, ?, ?) RETURNING id"#,
        )
        .bind(&entry.username)
        .bind(entry.action.as_str())
        .bind(entry.amount.value())
        .bind(timestamp(&entry.created_date))
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
               FROM transactions WHERE username = ?
               ORDER BY created_date DESC, id DESC
               LIMIT ?"#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }
}
