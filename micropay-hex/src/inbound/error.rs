//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use micropay_types::AppError;

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// Status code every error kind maps to.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::OverdraftNotAllowed { .. } => StatusCode::BAD_REQUEST,
            AppError::LedgerUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::AlreadyExists(msg) => msg.clone(),
            AppError::OverdraftNotAllowed { balance, requested } => format!(
                "Account not allowed overdraft: balance {}, requested {}",
                balance, requested
            ),
            AppError::LedgerUnavailable(msg) => format!(
                "Balance updated but the ledger could not record it: {}",
                msg
            ),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                msg.clone()
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}
