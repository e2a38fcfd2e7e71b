//! # Micropay Client SDK
//!
//! Typed Rust clients for the Accounts and Transactions APIs.
//!
//! The accounts service uses [`TransactionsClient`] to report balance
//! changes; the CLI uses both.

use std::time::Duration;

use micropay_types::{
    AccountAmount, AccountResponse, CreateAccountRequest, CreateTransactionRequest,
    TransactionDto,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared HTTP plumbing
// ─────────────────────────────────────────────────────────────────────────────

struct Core {
    base_url: String,
    http: Client,
}

impl Core {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn with_timeout(mut self, timeout: Duration) -> Result<Self, ClientError> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        handle_response(resp).await
    }
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    } else {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts API
// ─────────────────────────────────────────────────────────────────────────────

/// Accounts API client.
pub struct AccountsClient {
    core: Core,
}

impl AccountsClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            core: Core::new(base_url),
        }
    }

    /// Bounds every request by `timeout`.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            core: self.core.with_timeout(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.core.base_url
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        self.core.health().await
    }

    /// Creates a new account. Returns the service's `true` acknowledgement.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        balance: f64,
        can_overdraft: bool,
    ) -> Result<bool, ClientError> {
        let req = CreateAccountRequest {
            username: username.to_string(),
            password: password.to_string(),
            balance,
            can_overdraft,
        };
        self.core.post("/Accounts/CreateAccount", &req).await
    }

    /// Gets the current balance of an account.
    pub async fn get_balance(&self, username: &str) -> Result<AccountAmount, ClientError> {
        self.core
            .get(
                "/Accounts/GetBalanceByUsername",
                &[("username", username)],
            )
            .await
    }

    /// Gets the public view of an account.
    pub async fn get_account(&self, username: &str) -> Result<AccountResponse, ClientError> {
        self.core
            .get(
                "/Accounts/GetAccountByUsername",
                &[("username", username)],
            )
            .await
    }

    /// Deposits money into an account.
    pub async fn deposit(&self, username: &str, amount: f64) -> Result<AccountAmount, ClientError> {
        self.core
            .post("/Accounts/Deposit", &AccountAmount::new(username, amount))
            .await
    }

    /// Withdraws money from an account.
    pub async fn withdraw(
        &self,
        username: &str,
        amount: f64,
    ) -> Result<AccountAmount, ClientError> {
        self.core
            .post("/Accounts/Withdraw", &AccountAmount::new(username, amount))
            .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions API
// ─────────────────────────────────────────────────────────────────────────────

/// Transactions (ledger) API client.
pub struct TransactionsClient {
    core: Core,
}

impl TransactionsClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            core: Core::new(base_url),
        }
    }

    /// Bounds every request by `timeout`.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            core: self.core.with_timeout(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.core.base_url
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        self.core.health().await
    }

    /// Appends a ledger entry. Returns the service's `true` acknowledgement.
    pub async fn create_transaction(
        &self,
        req: &CreateTransactionRequest,
    ) -> Result<bool, ClientError> {
        self.core
            .post("/Transactions/CreateTransaction", req)
            .await
    }

    /// Lists the newest ledger entries for `username`, newest first.
    pub async fn latest_transactions(
        &self,
        username: &str,
    ) -> Result<Vec<TransactionDto>, ClientError> {
        self.core
            .get(
                "/Transactions/GetLatestTransactionsByUsername",
                &[("username", username)],
            )
            .await
    }
}
