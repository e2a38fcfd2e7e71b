//! HTTP Inbound Adapters
//!
//! Axum-based HTTP servers that drive the application layer, one per service.

mod accounts;
mod error;
mod extract;
mod server;
mod transactions;

pub use error::ApiError;
pub use extract::ApiJson;
pub use server::{AccountsServer, TransactionsServer};

/// `?username=` query shared by the lookup endpoints.
///
/// A missing parameter reads as empty so the service reports it as a bad request.
#[derive(Debug, Default, serde::Deserialize)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

impl UsernameQuery {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }
}
