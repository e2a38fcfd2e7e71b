//! Transactions (ledger) HTTP handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use micropay_types::{CreateTransactionRequest, LedgerRepository};

use super::UsernameQuery;
use super::extract::ApiJson;
use super::error::ApiError;
use crate::TransactionsService;

/// Ledger state shared across handlers.
pub struct TransactionsState<L: LedgerRepository> {
    pub service: TransactionsService<L>,
}

/// Append an entry to the ledger.
#[tracing::instrument(skip(state), fields(username = %req.username, action = %req.action))]
pub async fn create_transaction<L: LedgerRepository>(
    State(state): State<Arc<TransactionsState<L>>>,
    ApiJson(req): ApiJson<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.service.create_transaction(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the newest ledger entries for a username.
#[tracing::instrument(skip(state))]
pub async fn get_latest_transactions_by_username<L: LedgerRepository>(
    State(state): State<Arc<TransactionsState<L>>>,
    Query(query): Query<UsernameQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state
        .service
        .latest_transactions_by_username(query.username())
        .await?;
    Ok(Json(entries))
}
