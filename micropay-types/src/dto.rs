//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Field names are camelCase on the wire. Missing string and number fields
//! default to empty/zero so that validation, not deserialization, decides
//! what counts as invalid input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::ToSchema;

use crate::domain::{Account, Transaction, TransactionAction};

// ─────────────────────────────────────────────────────────────────────────────
// Account DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a new account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[schema(example = "alice")]
    #[serde(default)]
    pub username: String,
    #[schema(example = "s3cret")]
    #[serde(default)]
    pub password: String,
    /// Opening balance
    #[schema(example = 100.0)]
    #[serde(default)]
    pub balance: f64,
    /// Accepts `true`/`false` or `1`/`0`
    #[serde(default, deserialize_with = "bool_or_flag")]
    pub can_overdraft: bool,
}

/// A username paired with an amount.
///
/// Used as the deposit/withdraw request, as its confirmation (the amount
/// applied), and as the balance lookup response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountAmount {
    #[schema(example = "alice")]
    #[serde(default)]
    pub username: String,
    #[schema(example = 50.0)]
    #[serde(default)]
    pub amount: f64,
}

impl AccountAmount {
    pub fn new(username: impl Into<String>, amount: f64) -> Self {
        Self {
            username: username.into(),
            amount,
        }
    }
}

/// Public view of an account. The password hash never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = 100.0)]
    pub balance: f64,
    pub can_overdraft: bool,
    pub created_date: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            username: account.username,
            balance: account.balance,
            can_overdraft: account.can_overdraft,
            created_date: account.created_date,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to append an entry to the ledger.
///
/// `action` stays a string here so that an unknown action is reported as
/// a validation error rather than a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[schema(example = "alice")]
    #[serde(default)]
    pub username: String,
    #[schema(example = "DEPOSIT")]
    #[serde(default)]
    pub action: String,
    #[schema(example = 50.0)]
    #[serde(default)]
    pub amount: f64,
    #[schema(example = 150.0)]
    #[serde(default)]
    pub new_balance: f64,
}

impl CreateTransactionRequest {
    pub fn new(
        username: impl Into<String>,
        action: TransactionAction,
        amount: f64,
        new_balance: f64,
    ) -> Self {
        Self {
            username: username.into(),
            action: action.to_string(),
            amount,
            new_balance,
        }
    }
}

/// A ledger entry as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub action: TransactionAction,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = 50.0)]
    pub amount: f64,
    pub created_date: DateTime<Utc>,
    #[schema(example = 150.0)]
    pub new_balance: f64,
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        Self {
            action: tx.action,
            username: tx.username,
            amount: tx.amount,
            created_date: tx.created_date,
            new_balance: tx.new_balance,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Older clients send the overdraft flag as a 0/1 integer.
fn bool_or_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrFlag {
        Bool(bool),
        Flag(i64),
    }

    match BoolOrFlag::deserialize(deserializer)? {
        BoolOrFlag::Bool(b) => Ok(b),
        BoolOrFlag::Flag(0) => Ok(false),
        BoolOrFlag::Flag(1) => Ok(true),
        BoolOrFlag::Flag(n) => Err(de::Error::invalid_value(
            de::Unexpected::Signed(n),
            &"a boolean, 0 or 1",
        )),
    }
}
