//! HTTP adapter for the ledger notification port.

use std::time::Duration;

use async_trait::async_trait;
use micropay_client::{ClientError, TransactionsClient};
use micropay_types::{CreateTransactionRequest, LedgerNotifier, NotifyError};

/// Reports balance changes to the transactions service over HTTP.
pub struct HttpLedgerNotifier {
    client: TransactionsClient,
}

impl HttpLedgerNotifier {
    /// Creates a notifier targeting the transactions service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: TransactionsClient::new(base_url),
        }
    }

    /// Creates a notifier whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: TransactionsClient::new(base_url).with_timeout(timeout)?,
        })
    }
}

#[async_trait]
impl LedgerNotifier for HttpLedgerNotifier {
    async fn record(&self, entry: &CreateTransactionRequest) -> Result<(), NotifyError> {
        match self.client.create_transaction(entry).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(NotifyError::Rejected),
            Err(e) => Err(notify_error(e)),
        }
    }
}

fn notify_error(err: ClientError) -> NotifyError {
    match err {
        ClientError::Http(e) => NotifyError::Transport(e.to_string()),
        ClientError::Api { status, message } => NotifyError::Status { status, message },
        ClientError::Json(e) => NotifyError::InvalidResponse(e.to_string()),
    }
}
