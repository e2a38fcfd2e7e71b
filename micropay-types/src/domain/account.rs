//! Account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::amount::Amount;
use super::transaction::TransactionAction;
use crate::error::DomainError;

/// Surrogate identifier for an Account, assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    /// Wraps a storage-assigned id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    /// Unique login name
    pub username: String,
    /// Salted password hash, never the plaintext
    pub password_hash: String,
    /// Current balance, negative only for overdraft accounts
    pub balance: f64,
    /// Whether withdrawals may take the balance below zero
    pub can_overdraft: bool,
    pub created_date: DateTime<Utc>,
}

impl Account {
    /// Creates an account with all fields specified (for database reconstruction).
    pub fn from_parts(
        id: AccountId,
        username: String,
        password_hash: String,
        balance: f64,
        can_overdraft: bool,
        created_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            balance,
            can_overdraft,
            created_date,
        }
    }

    /// Returns true if withdrawing `amount` keeps the account within its limits.
    pub fn can_withdraw(&self, amount: Amount) -> bool {
        self.can_overdraft || self.balance - amount.value() >= 0.0
    }

    /// Applies a deposit or withdrawal and returns the new balance.
    ///
    /// A withdrawal from a non-overdraft account fails as a whole when the
    /// full amount is not covered; the balance is left untouched. So does any
    /// change whose result is no longer a finite number.
    pub fn apply(&mut self, action: TransactionAction, amount: Amount) -> Result<f64, DomainError> {
        let balance = match action {
            TransactionAction::Deposit => self.balance + amount.value(),
            TransactionAction::Withdraw => {
                if !self.can_withdraw(amount) {
                    return Err(DomainError::OverdraftNotAllowed {
                        balance: self.balance,
                        requested: amount.value(),
                    });
                }
                self.balance - amount.value()
            }
        };

        if !balance.is_finite() {
            return Err(DomainError::ValidationError(format!(
                "{} of {} would overflow the balance",
                action,
                amount.value()
            )));
        }

        self.balance = balance;
        Ok(balance)
    }
}

/// An account that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub balance: f64,
    pub can_overdraft: bool,
    pub created_date: DateTime<Utc>,
}

impl NewAccount {
    /// Creates a new account stamped with the current time.
    ///
    /// # Validation
    /// - Username cannot be empty
    /// - Password hash cannot be empty
    /// - Opening balance must be finite
    pub fn new(
        username: String,
        password_hash: String,
        balance: f64,
        can_overdraft: bool,
    ) -> Result<Self, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::EmptyField("username"));
        }
        if password_hash.is_empty() {
            return Err(DomainError::EmptyField("password"));
        }
        if !balance.is_finite() {
            return Err(DomainError::ValidationError(
                "Opening balance must be a finite number".into(),
            ));
        }

        Ok(Self {
            username,
            password_hash,
            balance,
            can_overdraft,
            created_date: Utc::now(),
        })
    }

    /// Attaches the storage-assigned id.
    pub fn into_account(self, id: AccountId) -> Account {
        Account::from_parts(
            id,
            self.username,
            self.password_hash,
            self.balance,
            self.can_overdraft,
            self.created_date,
        )
    }
}
