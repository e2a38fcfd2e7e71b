//! # Transactions Server
//!
//! Binary that serves the append-only ledger.

use micropay_app::{TransactionsConfig, telemetry};
use micropay_hex::{TransactionsService, inbound::TransactionsServer};
use micropay_repo::build_ledger_repo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = TransactionsConfig::from_env()?;
    let telemetry = telemetry::init("transactions-service", config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting transactions server on port {}", config.port);

    let repo = build_ledger_repo(&config.database_url).await?;
    let server = TransactionsServer::new(TransactionsService::new(repo));
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    telemetry.shutdown();
    Ok(())
}
