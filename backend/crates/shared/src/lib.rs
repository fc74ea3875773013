//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - Unified error type and result alias ([`error::app_error::AppError`])
//! - Error classification mapped onto HTTP status codes
//! - Typed identifiers for persisted entities
//!
//! Only things with the same meaning across all domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
