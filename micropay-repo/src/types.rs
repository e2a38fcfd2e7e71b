//! Database row types shared by the SQLite and PostgreSQL adapters.
//!
//! SQLite stores `created_date` as RFC 3339 text and PostgreSQL as
//! `TIMESTAMPTZ`; sqlx decodes both into `DateTime<Utc>`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use micropay_types::{
    Account, AccountId, RepoError, Transaction, TransactionAction, TransactionId,
};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Account row from database.
#[derive(FromRow)]
pub struct DbAccount {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub balance: f64,
    pub created_date: DateTime<Utc>,
    pub can_overdraft: bool,
}

/// Transaction row from database.
#[derive(FromRow)]
pub struct DbTransaction {
    pub id: i64,
    pub username: String,
    pub action: String,
    pub amount: f64,
    pub created_date: DateTime<Utc>,
    pub new_balance: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_action(s: &str) -> Result<TransactionAction, RepoError> {
    s.parse()
        .map_err(|_| RepoError::Database(format!("Unknown transaction action: {}", s)))
}

/// Maps an insert failure, turning a unique-key violation into a conflict.
pub fn map_insert_error(err: sqlx::Error, username: &str) -> RepoError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            RepoError::Conflict(format!("Account {} already exists", username))
        }
        _ => RepoError::Database(err.to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion
// ─────────────────────────────────────────────────────────────────────────────

impl From<DbAccount> for Account {
    fn from(row: DbAccount) -> Self {
        Account::from_parts(
            AccountId::new(row.id),
            row.username,
            row.password,
            row.balance,
            row.can_overdraft,
            row.created_date,
        )
    }
}

impl DbTransaction {
    /// Convert database row to domain Transaction.
    pub fn into_domain(self) -> Result<Transaction, RepoError> {
        Ok(Transaction {
            id: TransactionId::new(self.id),
            username: self.username,
            action: parse_action(&self.action)?,
            amount: self.amount,
            new_balance: self.new_balance,
            created_date: self.created_date,
        })
    }
}
