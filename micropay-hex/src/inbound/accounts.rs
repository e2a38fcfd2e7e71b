//! Accounts HTTP handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use micropay_types::{AccountAmount, AccountRepository, CreateAccountRequest, LedgerNotifier};

use super::UsernameQuery;
use super::extract::ApiJson;
use super::error::ApiError;
use crate::AccountsService;

/// Accounts state shared across handlers.
pub struct AccountsState<R: AccountRepository, N: LedgerNotifier> {
    pub service: AccountsService<R, N>,
}

/// Get the balance of an account.
#[tracing::instrument(skip(state))]
pub async fn get_balance_by_username<R: AccountRepository, N: LedgerNotifier>(
    State(state): State<Arc<AccountsState<R, N>>>,
    Query(query): Query<UsernameQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let balance = state
        .service
        .get_balance_by_username(query.username())
        .await?;
    Ok(Json(balance))
}

/// Get an account by username.
#[tracing::instrument(skip(state))]
pub async fn get_account_by_username<R: AccountRepository, N: LedgerNotifier>(
    State(state): State<Arc<AccountsState<R, N>>>,
    Query(query): Query<UsernameQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .service
        .get_account_by_username(query.username())
        .await?;
    Ok(Json(account))
}

/// Open a new account.
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn create_account<R: AccountRepository, N: LedgerNotifier>(
    State(state): State<Arc<AccountsState<R, N>>>,
    ApiJson(req): ApiJson<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.service.create_account(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Deposit money into an account.
#[tracing::instrument(skip(state), fields(username = %req.username, amount = req.amount))]
pub async fn deposit<R: AccountRepository, N: LedgerNotifier>(
    State(state): State<Arc<AccountsState<R, N>>>,
    ApiJson(req): ApiJson<AccountAmount>,
) -> Result<impl IntoResponse, ApiError> {
    let applied = state.service.deposit(req).await?;
    Ok(Json(applied))
}

/// Withdraw money from an account.
#[tracing::instrument(skip(state), fields(username = %req.username, amount = req.amount))]
pub async fn withdraw<R: AccountRepository, N: LedgerNotifier>(
    State(state): State<Arc<AccountsState<R, N>>>,
    ApiJson(req): ApiJson<AccountAmount>,
) -> Result<impl IntoResponse, ApiError> {
    let applied = state.service.withdraw(req).await?;
    Ok(Json(applied))
}
