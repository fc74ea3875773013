//! Auth (Authentication) Backend Module
//!
//! Wallet sign-in for the rental DApp.
//!
//! Clean Architecture structure:
//! - `domain/` - Account entity, value objects, repository trait, sign-in checks
//! - `application/` - Use cases, session tokens, configuration
//! - `infra/` - Postgres and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Flow
//! 1. `POST /auth/nonce` issues a one-time nonce for an address
//! 2. The wallet signs a SIWE (EIP-4361) message embedding that nonce
//! 3. `POST /auth/verify` checks the message, rotates the nonce and sets an
//!    HttpOnly `token` cookie holding an HS256 session JWT
//! 4. `GET /me` resolves the cookie to the account; `POST /logout` clears it
//!
//! ## Security Model
//! - A nonce is valid until the next nonce request or the next successful
//!   verify, so a signed message verifies at most once
//! - Sessions are stateless; a token stays valid until `exp`
//! - The nonce is never returned by `/me`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, FailedVerifyPolicy};
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAccountRepository, postgres::PgAccountRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::account::Account;
    pub use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::{AccountRepository, LocalAccountRepository};
    pub use crate::infra::{InMemoryAccountRepository, PgAccountRepository};
}
