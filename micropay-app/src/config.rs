//! Configuration loading from environment.

use std::env;
use std::time::Duration;

const DEFAULT_ACCOUNTS_PORT: u16 = 3001;
const DEFAULT_TRANSACTIONS_PORT: u16 = 3000;
const DEFAULT_TRANSACTIONS_URL: &str = "http://localhost:3000";

/// Accounts service configuration.
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    pub port: u16,
    pub database_url: String,
    /// Base URL of the transactions service
    pub transactions_url: String,
    /// Upper bound on each ledger notification; `None` waits indefinitely
    pub transactions_timeout: Option<Duration>,
    pub ledger_notifications: bool,
    pub otlp_endpoint: Option<String>,
}

/// Transactions service configuration.
#[derive(Debug, Clone)]
pub struct TransactionsConfig {
    pub port: u16,
    pub database_url: String,
    pub otlp_endpoint: Option<String>,
}

impl AccountsConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = parse_port(var("PORT"), DEFAULT_ACCOUNTS_PORT)?;

        let database_url = var("ACCOUNTS_DATABASE_URL").ok_or_else(|| {
            anyhow::anyhow!("ACCOUNTS_DATABASE_URL environment variable is required")
        })?;

        let transactions_url =
            var("TRANSACTIONS_URL").unwrap_or_else(|| DEFAULT_TRANSACTIONS_URL.to_string());

        let transactions_timeout = match var("TRANSACTIONS_TIMEOUT_SECS") {
            Some(secs) => Some(Duration::from_secs(secs.parse().map_err(|_| {
                anyhow::anyhow!("TRANSACTIONS_TIMEOUT_SECS must be a whole number of seconds")
            })?)),
            None => None,
        };

        let ledger_notifications = match var("LEDGER_NOTIFICATIONS") {
            Some(v) => parse_bool(&v)
                .ok_or_else(|| anyhow::anyhow!("LEDGER_NOTIFICATIONS must be true or false"))?,
            None => true,
        };

        Ok(Self {
            port,
            database_url,
            transactions_url,
            transactions_timeout,
            ledger_notifications,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

impl TransactionsConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = parse_port(var("PORT"), DEFAULT_TRANSACTIONS_PORT)?;

        let database_url = var("TRANSACTIONS_DATABASE_URL").ok_or_else(|| {
            anyhow::anyhow!("TRANSACTIONS_DATABASE_URL environment variable is required")
        })?;

        Ok(Self {
            port,
            database_url,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn parse_port(value: Option<String>, default: u16) -> anyhow::Result<u16> {
    match value {
        Some(port) => Ok(port.parse()?),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
