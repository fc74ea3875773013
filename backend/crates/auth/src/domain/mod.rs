//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the sign-in checks.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::account::Account;
pub use repository::AccountRepository;
