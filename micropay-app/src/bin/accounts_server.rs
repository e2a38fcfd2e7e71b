//! # Accounts Server
//!
//! Binary that wires together the accounts service:
//! - Load configuration from environment
//! - Initialize the accounts store
//! - Point the ledger notifier at the transactions service
//! - Start the HTTP server

use micropay_app::{AccountsConfig, telemetry};
use micropay_hex::{AccountsService, HttpLedgerNotifier, inbound::AccountsServer};
use micropay_repo::build_accounts_repo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AccountsConfig::from_env()?;
    let telemetry = telemetry::init("accounts-service", config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting accounts server on port {}", config.port);
    tracing::info!("Reporting balance changes to {}", config.transactions_url);
    if !config.ledger_notifications {
        tracing::warn!("Ledger notifications are disabled");
    }

    // Build repository (handles connection and migration)
    let repo = build_accounts_repo(&config.database_url).await?;

    let notifier = match config.transactions_timeout {
        Some(timeout) => HttpLedgerNotifier::with_timeout(&config.transactions_url, timeout)?,
        None => HttpLedgerNotifier::new(&config.transactions_url),
    };

    let service = AccountsService::new(repo, notifier)
        .with_ledger_notifications(config.ledger_notifications);

    let server = AccountsServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    telemetry.shutdown();
    Ok(())
}
