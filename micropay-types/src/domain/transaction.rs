//! Ledger transaction domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::amount::Amount;
use crate::error::DomainError;

/// Number of entries returned by a latest-transactions lookup.
pub const LATEST_TRANSACTIONS_LIMIT: i64 = 10;

/// Surrogate identifier for a ledger Transaction, assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of balance change a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionAction {
    /// Money added to an account
    Deposit,
    /// Money taken from an account
    Withdraw,
}

impl TransactionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionAction::Deposit => "DEPOSIT",
            TransactionAction::Withdraw => "WITHDRAW",
        }
    }
}

impl std::fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(TransactionAction::Deposit),
            "WITHDRAW" => Ok(TransactionAction::Withdraw),
            other => Err(DomainError::UnknownAction(other.to_string())),
        }
    }
}

/// A recorded ledger entry.
///
/// Transactions are append-only - they are never updated or deleted.
/// The username is a plain string: the ledger does not know whether
/// the account still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub username: String,
    pub action: TransactionAction,
    /// Magnitude of the change
    pub amount: f64,
    /// Account balance right after the change
    pub new_balance: f64,
    pub created_date: DateTime<Utc>,
}

/// A ledger entry that has not been appended yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub username: String,
    pub action: TransactionAction,
    pub amount: Amount,
    pub new_balance: f64,
    pub created_date: DateTime<Utc>,
}

impl NewTransaction {
    /// Creates a new ledger entry stamped with the current time.
    pub fn new(
        username: String,
        action: TransactionAction,
        amount: Amount,
        new_balance: f64,
    ) -> Result<Self, DomainError> {
        Self::at(username, action, amount, new_balance, Utc::now())
    }

    /// Creates a new ledger entry with an explicit timestamp.
    pub fn at(
        username: String,
        action: TransactionAction,
        amount: Amount,
        new_balance: f64,
        created_date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::EmptyField("username"));
        }

        Ok(Self {
            username,
            action,
            amount,
            new_balance,
            created_date,
        })
    }

    /// Attaches the storage-assigned id.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            username: self.username,
            action: self.action,
            amount: self.amount.value(),
            new_balance: self.new_balance,
            created_date: self.created_date,
        }
    }
}
