//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the infra layer.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::entity::account::Account;
use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};
use crate::error::AuthResult;

/// Account store, keyed by normalized address
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create the account on first contact, otherwise replace its nonce.
    ///
    /// Sets `updated_at`; `created_at` only on insert. Single-row atomic.
    async fn upsert_nonce(
        &self,
        address: &WalletAddress,
        nonce: &Nonce,
        now: DateTime<Utc>,
    ) -> AuthResult<Account>;

    /// Plain insert. A second account for the same address is an error,
    /// never a merge.
    async fn insert(&self, account: &Account) -> AuthResult<()>;

    async fn find_by_address(&self, address: &WalletAddress) -> AuthResult<Option<Account>>;

    async fn find_by_id(&self, id: &AccountId) -> AuthResult<Option<Account>>;

    /// Replace the nonce and stamp `last_login_at` in one write.
    async fn record_login(&self, id: &AccountId, nonce: &Nonce, now: DateTime<Utc>)
    -> AuthResult<()>;

    /// Readiness check
    async fn ping(&self) -> AuthResult<()>;
}
