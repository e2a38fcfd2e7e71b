//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use micropay_types::domain::TransactionAction;
use micropay_types::dto::{
    AccountAmount, AccountResponse, CreateAccountRequest, CreateTransactionRequest,
    TransactionDto,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// Get the balance of an account
#[utoipa::path(
    get,
    path = "/Accounts/GetBalanceByUsername",
    tag = "accounts",
    params(
        ("username" = String, Query, description = "Account username")
    ),
    responses(
        (status = 200, description = "Current balance", body = AccountAmount),
        (status = 400, description = "Missing username"),
        (status = 404, description = "Account not found"),
        (status = 422, description = "Unexpected failure")
    )
)]
async fn get_balance_by_username() {}

/// Get an account by username
#[utoipa::path(
    get,
    path = "/Accounts/GetAccountByUsername",
    tag = "accounts",
    params(
        ("username" = String, Query, description = "Account username")
    ),
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 400, description = "Missing username"),
        (status = 404, description = "Account not found"),
        (status = 422, description = "Unexpected failure")
    )
)]
async fn get_account_by_username() {}

/// Create a new account
#[utoipa::path(
    post,
    path = "/Accounts/CreateAccount",
    tag = "accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = bool),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username already taken"),
        (status = 422, description = "Unexpected failure")
    )
)]
async fn create_account() {}

/// Deposit money into an account
#[utoipa::path(
    post,
    path = "/Accounts/Deposit",
    tag = "accounts",
    request_body = AccountAmount,
    responses(
        (status = 200, description = "Deposit applied", body = AccountAmount),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Account not found"),
        (status = 422, description = "Ledger unavailable or unexpected failure")
    )
)]
async fn deposit() {}

/// Withdraw money from an account
#[utoipa::path(
    post,
    path = "/Accounts/Withdraw",
    tag = "accounts",
    request_body = AccountAmount,
    responses(
        (status = 200, description = "Withdrawal applied", body = AccountAmount),
        (status = 400, description = "Invalid request or overdraft not allowed"),
        (status = 404, description = "Account not found"),
        (status = 422, description = "Ledger unavailable or unexpected failure")
    )
)]
async fn withdraw() {}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions
// ─────────────────────────────────────────────────────────────────────────────

/// Append an entry to the ledger
#[utoipa::path(
    post,
    path = "/Transactions/CreateTransaction",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Entry recorded", body = bool),
        (status = 400, description = "Invalid request"),
        (status = 422, description = "Unexpected failure")
    )
)]
async fn create_transaction() {}

/// List the ten newest ledger entries for a username
#[utoipa::path(
    get,
    path = "/Transactions/GetLatestTransactionsByUsername",
    tag = "transactions",
    params(
        ("username" = String, Query, description = "Account username")
    ),
    responses(
        (status = 200, description = "Newest entries first", body = Vec<TransactionDto>),
        (status = 400, description = "Missing username"),
        (status = 422, description = "Unexpected failure")
    )
)]
async fn get_latest_transactions_by_username() {}

/// OpenAPI documentation for the Accounts API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Micropay Accounts API",
        version = "1.0.0",
        description = "Accounts with balances and an optional overdraft. Every deposit and withdrawal is reported to the Transactions API.",
    ),
    paths(
        health,
        get_balance_by_username,
        get_account_by_username,
        create_account,
        deposit,
        withdraw,
    ),
    components(schemas(CreateAccountRequest, AccountAmount, AccountResponse)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Account management and balance changes"),
    )
)]
pub struct AccountsApiDoc;

/// OpenAPI documentation for the Transactions API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Micropay Transactions API",
        version = "1.0.0",
        description = "Append-only ledger of balance changes.",
    ),
    paths(health, create_transaction, get_latest_transactions_by_username),
    components(schemas(CreateTransactionRequest, TransactionDto, TransactionAction)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "transactions", description = "Ledger entries"),
    )
)]
pub struct TransactionsApiDoc;
