//! Application services.
//!
//! Orchestrate domain operations through the port traits.
//! Contain NO infrastructure logic - pure business orchestration.

mod accounts;
mod transactions;

pub use accounts::AccountsService;
pub use transactions::TransactionsService;

use micropay_types::{AppError, DomainError};

/// Rejects blank usernames before any storage access.
pub(crate) fn require_username(username: &str) -> Result<&str, AppError> {
    if username.trim().is_empty() {
        return Err(DomainError::EmptyField("username").into());
    }
    Ok(username)
}
