//! Domain models for the accounts and transactions services.

pub mod account;
pub mod amount;
pub mod transaction;

pub use account::{Account, AccountId, NewAccount};
pub use amount::Amount;
pub use transaction::{
    LATEST_TRANSACTIONS_LIMIT, NewTransaction, Transaction, TransactionAction, TransactionId,
};
