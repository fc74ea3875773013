//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Taxonomy: malformed or missing input is 400, failed proofs of wallet
//! ownership and bad sessions are 401, an unknown account behind a valid
//! session is 404, store failures are 500 (503 for readiness).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::siwe::SiweError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    // ------------------------------------------------------------------
    // Client errors (400)
    // ------------------------------------------------------------------
    #[error("address required")]
    AddressRequired,

    #[error("Missing params")]
    MissingParams,

    /// Verify called for an address that never requested a nonce
    #[error("Call /auth/nonce first")]
    NonceNotRequested,

    #[error("Malformed SIWE message: {0}")]
    MalformedMessage(String),

    // ------------------------------------------------------------------
    // Handshake failures (401)
    // ------------------------------------------------------------------
    #[error("Domain mismatch")]
    DomainMismatch,

    #[error("Nonce mismatch")]
    NonceMismatch,

    #[error("Message expired")]
    MessageExpired,

    #[error("Message not yet valid")]
    MessageNotYetValid,

    #[error("Invalid SIWE signature")]
    InvalidSignature,

    #[error("Address mismatch")]
    AddressMismatch,

    // ------------------------------------------------------------------
    // Session errors
    // ------------------------------------------------------------------
    /// No session cookie on the request
    #[error("unauthorized")]
    Unauthenticated,

    #[error("invalid token")]
    SessionInvalid,

    #[error("token expired")]
    SessionExpired,

    #[error("user not found")]
    UserNotFound,

    // ------------------------------------------------------------------
    // Server errors
    // ------------------------------------------------------------------
    #[error("Duplicate account address: {0}")]
    DuplicateAddress(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::AddressRequired
            | AuthError::MissingParams
            | AuthError::NonceNotRequested
            | AuthError::MalformedMessage(_) => ErrorKind::BadRequest,
            AuthError::DomainMismatch
            | AuthError::NonceMismatch
            | AuthError::MessageExpired
            | AuthError::MessageNotYetValid
            | AuthError::InvalidSignature
            | AuthError::AddressMismatch
            | AuthError::Unauthenticated
            | AuthError::SessionInvalid
            | AuthError::SessionExpired => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::StoreUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::DuplicateAddress(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// True for the 401s raised while checking a signed sign-in message
    pub fn is_handshake_failure(&self) -> bool {
        matches!(
            self,
            AuthError::DomainMismatch
                | AuthError::NonceMismatch
                | AuthError::MessageExpired
                | AuthError::MessageNotYetValid
                | AuthError::InvalidSignature
                | AuthError::AddressMismatch
        )
    }

    /// Convert to AppError. Server-side details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self.kind() {
            ErrorKind::InternalServerError => AppError::internal("Server error"),
            ErrorKind::ServiceUnavailable => AppError::service_unavailable("Store unavailable"),
            kind => AppError::new(kind, self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::DuplicateAddress(address) => {
                tracing::error!(%address, "Account uniqueness violated");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::StoreUnavailable(msg) => {
                tracing::warn!(message = %msg, "Store not ready");
            }
            e if e.is_handshake_failure() => {
                tracing::warn!(error = %e, "Sign-in rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<SiweError> for AuthError {
    fn from(err: SiweError) -> Self {
        match err {
            SiweError::InvalidMessage(_) | SiweError::InvalidAddress(_) => {
                AuthError::MalformedMessage(err.to_string())
            }
            SiweError::InvalidSignatureEncoding | SiweError::UnrecoverableSignature => {
                AuthError::InvalidSignature
            }
            SiweError::Expired => AuthError::MessageExpired,
            SiweError::NotYetValid => AuthError::MessageNotYetValid,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AuthError::Internal(format!("session token: {err}"))
    }
}
