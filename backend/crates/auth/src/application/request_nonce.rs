//! Request Nonce Use Case
//!
//! First leg of the handshake: hand out a fresh challenge for an address.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};
use crate::error::AuthResult;

pub struct RequestNonceInput {
    pub address: String,
}

pub struct RequestNonceOutput {
    pub nonce: String,
}

pub struct RequestNonceUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> RequestNonceUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Issue a nonce, replacing any previous one for the address.
    pub async fn execute(
        &self,
        input: RequestNonceInput,
        now: DateTime<Utc>,
    ) -> AuthResult<RequestNonceOutput> {
        let address = WalletAddress::parse(&input.address)?;
        let nonce = Nonce::generate();

        let account = self.repo.upsert_nonce(&address, &nonce, now).await?;

        tracing::debug!(account_id = %account.id, address = %address, "Nonce issued");

        Ok(RequestNonceOutput {
            nonce: nonce.into_inner(),
        })
    }
}
