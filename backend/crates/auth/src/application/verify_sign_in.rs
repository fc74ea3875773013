//! Verify Sign-In Use Case
//!
//! Second leg of the handshake: check the signed message against the stored
//! nonce, consume the nonce and mint a session token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::siwe::SiweMessage;

use crate::application::config::{AuthConfig, FailedVerifyPolicy};
use crate::application::session_token::issue_session_token;
use crate::domain::repository::AccountRepository;
use crate::domain::services::{SignInExpectation, verify_sign_in};
use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};
use crate::error::{AuthError, AuthResult};

pub struct VerifySignInInput {
    pub address: String,
    /// Canonical EIP-4361 text, exactly as signed
    pub message: String,
    /// 65-byte signature, hex
    pub signature: String,
}

#[derive(Debug)]
pub struct VerifySignInOutput {
    pub account_id: AccountId,
    pub address: String,
    pub session_token: String,
}

pub struct VerifySignInUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> VerifySignInUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        input: VerifySignInInput,
        now: DateTime<Utc>,
    ) -> AuthResult<VerifySignInOutput> {
        if input.address.trim().is_empty()
            || input.message.trim().is_empty()
            || input.signature.trim().is_empty()
        {
            return Err(AuthError::MissingParams);
        }

        let address = WalletAddress::parse(&input.address)?;

        let account = self
            .repo
            .find_by_address(&address)
            .await?
            .ok_or(AuthError::NonceNotRequested)?;

        let message: SiweMessage = input.message.parse()?;

        let expected = SignInExpectation {
            domain: &self.config.domain,
            nonce: &account.nonce,
            address: &address,
            now,
        };

        if let Err(err) = verify_sign_in(&message, &input.message, &input.signature, &expected) {
            self.apply_failure_policy(&address, now).await?;
            return Err(err);
        }

        // Consume the nonce: the same signed message can never verify twice.
        self.repo
            .record_login(&account.id, &Nonce::generate(), now)
            .await?;

        let session_token = issue_session_token(
            &self.config.session_secret,
            &account,
            now,
            self.config.session_ttl_chrono()?,
        )?;

        tracing::info!(account_id = %account.id, address = %address, "Wallet signed in");

        Ok(VerifySignInOutput {
            account_id: account.id,
            address: address.into_inner(),
            session_token,
        })
    }

    async fn apply_failure_policy(
        &self,
        address: &WalletAddress,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        match self.config.failed_verify_policy {
            FailedVerifyPolicy::PreserveNonce => Ok(()),
            FailedVerifyPolicy::RotateNonce => {
                self.repo
                    .upsert_nonce(address, &Nonce::generate(), now)
                    .await?;
                tracing::debug!(address = %address, "Nonce rotated after failed sign-in");
                Ok(())
            }
        }
    }
}
