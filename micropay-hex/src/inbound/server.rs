//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use micropay_types::{AccountRepository, LedgerNotifier, LedgerRepository};

use super::accounts::{self, AccountsState};
use super::transactions::{self, TransactionsState};
use crate::openapi::{AccountsApiDoc, TransactionsApiDoc};
use crate::{AccountsService, TransactionsService};

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn accounts_openapi() -> impl IntoResponse {
    Json(AccountsApiDoc::openapi())
}

async fn transactions_openapi() -> impl IntoResponse {
    Json(TransactionsApiDoc::openapi())
}

/// HTTP Server for the Accounts API.
pub struct AccountsServer<R: AccountRepository, N: LedgerNotifier> {
    state: Arc<AccountsState<R, N>>,
}

impl<R: AccountRepository, N: LedgerNotifier> AccountsServer<R, N> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: AccountsService<R, N>) -> Self {
        Self {
            state: Arc::new(AccountsState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(health))
            .route("/api-docs/openapi.json", get(accounts_openapi))
            .route(
                "/Accounts/GetBalanceByUsername",
                get(accounts::get_balance_by_username::<R, N>),
            )
            .route(
                "/Accounts/GetAccountByUsername",
                get(accounts::get_account_by_username::<R, N>),
            )
            .route(
                "/Accounts/CreateAccount",
                post(accounts::create_account::<R, N>),
            )
            .route("/Accounts/Deposit", post(accounts::deposit::<R, N>))
            .route("/Accounts/Withdraw", post(accounts::withdraw::<R, N>))
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        serve("Accounts", self.router(), addr).await
    }
}

/// HTTP Server for the Transactions API.
pub struct TransactionsServer<L: LedgerRepository> {
    state: Arc<TransactionsState<L>>,
}

impl<L: LedgerRepository> TransactionsServer<L> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: TransactionsService<L>) -> Self {
        Self {
            state: Arc::new(TransactionsState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(health))
            .route("/api-docs/openapi.json", get(transactions_openapi))
            .route(
                "/Transactions/CreateTransaction",
                post(transactions::create_transaction::<L>),
            )
            .route(
                "/Transactions/GetLatestTransactionsByUsername",
                get(transactions::get_latest_transactions_by_username::<L>),
            )
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        serve("Transactions", self.router(), addr).await
    }
}

async fn serve(name: &str, router: Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("{} server listening on {}", name, listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
