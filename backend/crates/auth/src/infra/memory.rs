//! In-Memory Repository Implementation
//!
//! Same semantics as the Postgres store, held in process. Each operation is
//! a single write section, which gives the per-row atomicity the handshake
//! relies on.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use tokio::sync::RwLock;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    by_address: HashMap<WalletAddress, AccountId>,
}

#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl AccountRepository for InMemoryAccountRepository {
    async fn upsert_nonce(
        &self,
        address: &WalletAddress,
        nonce: &Nonce,
        now: DateTime<Utc>,
    ) -> AuthResult<Account> {
        let mut state = self.state.write().await;

        if let Some(id) = state.by_address.get(address).copied() {
            let account = state
                .accounts
                .get_mut(&id)
                .ok_or_else(|| AuthError::Internal(format!("dangling address index for {id}")))?;
            account.reissue_nonce(nonce.clone(), now);
            return Ok(account.clone());
        }

        let account = Account::new(address.clone(), nonce.clone(), now);
        state.by_address.insert(address.clone(), account.id);
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn insert(&self, account: &Account) -> AuthResult<()> {
        let mut state = self.state.write().await;

        if state.by_address.contains_key(&account.address) {
            return Err(AuthError::DuplicateAddress(account.address.to_string()));
        }

        state.by_address.insert(account.address.clone(), account.id);
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_address(&self, address: &WalletAddress) -> AuthResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state
            .by_address
            .get(address)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(id).cloned())
    }

    async fn record_login(
        &self,
        id: &AccountId,
        nonce: &Nonce,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        let mut state = self.state.write().await;
        let account = state.accounts.get_mut(id).ok_or(AuthError::UserNotFound)?;
        account.record_login(nonce.clone(), now);
        Ok(())
    }

    async fn ping(&self) -> AuthResult<()> {
        Ok(())
    }
}
