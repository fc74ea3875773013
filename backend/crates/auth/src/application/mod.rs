//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_session;
pub mod request_nonce;
pub mod session_token;
pub mod verify_sign_in;

// Re-exports
pub use config::{AuthConfig, FailedVerifyPolicy};
pub use current_session::CurrentSessionUseCase;
pub use request_nonce::{RequestNonceInput, RequestNonceOutput, RequestNonceUseCase};
pub use session_token::{SessionClaims, decode_session_token, issue_session_token};
pub use verify_sign_in::{VerifySignInInput, VerifySignInOutput, VerifySignInUseCase};
