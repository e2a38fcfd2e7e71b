//! Error types for the accounts and transactions services.

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Unknown transaction action: {0}")]
    UnknownAction(String),

    #[error("Account not allowed overdraft: balance {balance}, requested {requested}")]
    OverdraftNotAllowed { balance: f64, requested: f64 },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Account not allowed overdraft: balance {balance}, requested {requested}")]
    OverdraftNotAllowed { balance: f64, requested: f64 },

    /// The balance change was committed but the ledger did not record it.
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::OverdraftNotAllowed { balance, requested } => {
                AppError::OverdraftNotAllowed { balance, requested }
            }
            e => AppError::BadRequest(e.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Conflict(e) => AppError::AlreadyExists(e),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Transaction(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overdraft_maps_through_repo_error() {
        let err: AppError = RepoError::Domain(DomainError::OverdraftNotAllowed {
            balance: 100.0,
            requested: 150.0,
        })
        .into();
        assert!(matches!(err, AppError::OverdraftNotAllowed { .. }));
    }

    #[test]
    fn test_conflict_maps_to_already_exists() {
        let err: AppError = RepoError::Conflict("alice".into()).into();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[test]
    fn test_database_error_is_internal() {
        let err: AppError = RepoError::Database("disk full".into()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
