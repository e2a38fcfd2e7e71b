//! Client example demonstrating the account and ledger flows against running servers.
//!
//! Run with: cargo run -p micropay-app --example client_example --no-default-features --features sqlite

use micropay_client::{AccountsClient, ClientError, TransactionsClient};
use micropay_hex::{
    AccountsService, HttpLedgerNotifier, TransactionsService,
    inbound::{AccountsServer, TransactionsServer},
};
use micropay_repo::{build_accounts_repo, build_ledger_repo};
use tempfile::tempdir;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Use temp file-backed SQLite databases, one per service
    let tmp = tempdir()?;
    let accounts_db = format!("sqlite://{}?mode=rwc", tmp.path().join("accounts.db").display());
    let ledger_db = format!("sqlite://{}?mode=rwc", tmp.path().join("ledger.db").display());

    // Transactions service first; the accounts service reports to it
    let ledger_listener = TcpListener::bind("127.0.0.1:0").await?;
    let ledger_url = format!("http://{}", ledger_listener.local_addr()?);
    let ledger_router =
        TransactionsServer::new(TransactionsService::new(build_ledger_repo(&ledger_db).await?))
            .router();
    tokio::spawn(async move { axum::serve(ledger_listener, ledger_router).await });

    let accounts_listener = TcpListener::bind("127.0.0.1:0").await?;
    let accounts_url = format!("http://{}", accounts_listener.local_addr()?);
    let service = AccountsService::new(
        build_accounts_repo(&accounts_db).await?,
        HttpLedgerNotifier::new(&ledger_url),
    );
    let accounts_router = AccountsServer::new(service).router();
    tokio::spawn(async move { axum::serve(accounts_listener, accounts_router).await });

    println!("🚀 Accounts API on {accounts_url}, Transactions API on {ledger_url}");

    let accounts = AccountsClient::new(&accounts_url);
    let ledger = TransactionsClient::new(&ledger_url);

    println!("✅ Accounts health: {}", accounts.health().await?);
    println!("✅ Transactions health: {}", ledger.health().await?);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: overdraft and non-overdraft accounts
    // ─────────────────────────────────────────────────────────────────────────

    accounts.create_account("alice", "s3cret", 100.0, true).await?;
    accounts.create_account("bob", "hunter2", 100.0, false).await?;
    println!("✅ Created alice (overdraft) and bob (no overdraft)");

    accounts.deposit("alice", 25.0).await?;
    accounts.withdraw("alice", 150.0).await?;
    let balance = accounts.get_balance("alice").await?;
    println!("   alice balance: {:.2}", balance.amount);

    match accounts.withdraw("bob", 150.0).await {
        Err(ClientError::Api { status, message }) => {
            println!("✅ bob overdraft refused ({status}): {message}");
        }
        other => anyhow::bail!("expected bob's withdrawal to be refused, got {:?}", other),
    }

    let bob = accounts.get_account("bob").await?;
    println!("   bob balance: {:.2}", bob.balance);

    println!("\n📋 alice's ledger:");
    for entry in ledger.latest_transactions("alice").await? {
        println!(
            "   - {} {:.2} -> {:.2} at {}",
            entry.action, entry.amount, entry.new_balance, entry.created_date
        );
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
