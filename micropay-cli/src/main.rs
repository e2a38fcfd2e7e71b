//! Micropay CLI
//!
//! Command-line interface for the Accounts and Transactions APIs.

use anyhow::Result;
use clap::{Parser, Subcommand};

use micropay_client::{AccountsClient, TransactionsClient};
use micropay_types::{CreateTransactionRequest, TransactionAction};

#[derive(Parser)]
#[command(name = "micropay")]
#[command(author, version, about = "Micropay accounts and ledger CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Accounts API
    #[arg(
        long,
        env = "MICROPAY_ACCOUNTS_URL",
        default_value = "http://localhost:3001"
    )]
    accounts_url: String,

    /// Base URL of the Transactions API
    #[arg(
        long,
        env = "MICROPAY_TRANSACTIONS_URL",
        default_value = "http://localhost:3000"
    )]
    transactions_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account operations
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
    /// Ledger operations
    Ledger {
        #[command(subcommand)]
        action: LedgerCommands,
    },
    /// Check health of both APIs
    Health,
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Create a new account
    Create {
        /// Unique username
        username: String,
        #[arg(long)]
        password: String,
        /// Opening balance
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
        /// Allow the balance to go below zero
        #[arg(long)]
        overdraft: bool,
    },
    /// Show the current balance
    Balance { username: String },
    /// Get account details
    Get { username: String },
    /// Deposit funds into an account
    Deposit {
        username: String,
        #[arg(long)]
        amount: f64,
    },
    /// Withdraw funds from an account
    Withdraw {
        username: String,
        #[arg(long)]
        amount: f64,
    },
}

#[derive(Subcommand)]
enum LedgerCommands {
    /// Append an entry directly to the ledger
    Record {
        username: String,
        /// DEPOSIT or WITHDRAW
        #[arg(long)]
        action: String,
        #[arg(long)]
        amount: f64,
        #[arg(long, allow_negative_numbers = true)]
        new_balance: f64,
    },
    /// List the ten newest entries for a username
    Latest { username: String },
}

fn parse_action(s: &str) -> Result<TransactionAction> {
    s.to_uppercase()
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown action: {}. Supported: DEPOSIT, WITHDRAW", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let accounts = AccountsClient::new(&cli.accounts_url);
    let ledger = TransactionsClient::new(&cli.transactions_url);

    match cli.command {
        Commands::Health => {
            let accounts_ok = accounts.health().await.unwrap_or(false);
            let ledger_ok = ledger.health().await.unwrap_or(false);
            println!(
                "{} Accounts API ({})",
                if accounts_ok { "✓" } else { "✗" },
                accounts.base_url()
            );
            println!(
                "{} Transactions API ({})",
                if ledger_ok { "✓" } else { "✗" },
                ledger.base_url()
            );
            if !(accounts_ok && ledger_ok) {
                std::process::exit(1);
            }
        }

        Commands::Account { action } => match action {
            AccountCommands::Create {
                username,
                password,
                balance,
                overdraft,
            } => {
                accounts
                    .create_account(&username, &password, balance, overdraft)
                    .await?;
                println!("✓ Account {} created", username);
            }
            AccountCommands::Balance { username } => {
                let balance = accounts.get_balance(&username).await?;
                println!("{}", serde_json::to_string_pretty(&balance)?);
            }
            AccountCommands::Get { username } => {
                let account = accounts.get_account(&username).await?;
                println!("{}", serde_json::to_string_pretty(&account)?);
            }
            AccountCommands::Deposit { username, amount } => {
                let applied = accounts.deposit(&username, amount).await?;
                println!("{}", serde_json::to_string_pretty(&applied)?);
            }
            AccountCommands::Withdraw { username, amount } => {
                let applied = accounts.withdraw(&username, amount).await?;
                println!("{}", serde_json::to_string_pretty(&applied)?);
            }
        },

        Commands::Ledger { action } => match action {
            LedgerCommands::Record {
                username,
                action,
                amount,
                new_balance,
            } => {
                let action = parse_action(&action)?;
                let req = CreateTransactionRequest::new(&username, action, amount, new_balance);
                ledger.create_transaction(&req).await?;
                println!("✓ {} of {:.2} recorded for {}", action, amount, username);
            }
            LedgerCommands::Latest { username } => {
                let entries = ledger.latest_transactions(&username).await?;
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        },
    }

    Ok(())
}
