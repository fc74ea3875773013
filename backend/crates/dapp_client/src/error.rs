//! Client Error Types

use platform::siwe::SiweError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet returned no accounts")]
    NoAccounts,

    #[error("user rejected the request")]
    Rejected,

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("wallet is not connected to {0}")]
    UnknownAccount(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx reply; `message` is the server's `error` field when present
    #[error("server responded with {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("invalid sign-in message: {0}")]
    Siwe(#[from] SiweError),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// HTTP status for `Api` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
