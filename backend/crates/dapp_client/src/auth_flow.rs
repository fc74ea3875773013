//! Client Auth Flow
//!
//! Wallet connection -> nonce -> SIWE message -> signature -> verify ->
//! profile. Every step must succeed; any failure leaves the client signed
//! out and is reported as a [`LoginError`] naming the step.

use std::fmt;

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use platform::siwe::SiweMessage;

use crate::api::{AuthApi, UserProfile, VerifyPayload};
use crate::error::{ClientError, WalletError};
use crate::wallet::WalletProvider;

/// Progress shown to the user while signing in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    Connecting,
    RequestingNonce,
    AwaitingSignature,
    Verifying,
    LoggedIn,
    Failed,
}

impl LoginStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::Connecting => "Connecting to wallet...",
            LoginStatus::RequestingNonce => "Requesting nonce from backend...",
            LoginStatus::AwaitingSignature => "Waiting for signature...",
            LoginStatus::Verifying => "Verifying signature...",
            LoginStatus::LoggedIn => "Logged in!",
            LoginStatus::Failed => "Login failed. Check console for details.",
        }
    }
}

impl fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step at which a login attempt stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    Connect,
    Nonce,
    Sign,
    Verify,
    Profile,
}

impl fmt::Display for LoginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoginStage::Connect => "wallet connection",
            LoginStage::Nonce => "nonce request",
            LoginStage::Sign => "message signing",
            LoginStage::Verify => "signature verification",
            LoginStage::Profile => "profile fetch",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Login failed during {stage}: {source}")]
pub struct LoginError {
    pub stage: LoginStage,
    #[source]
    pub source: ClientError,
}

impl LoginError {
    fn at(stage: LoginStage) -> impl FnOnce(ClientError) -> Self {
        move |source| Self { stage, source }
    }
}

pub struct AuthFlow<W> {
    api: AuthApi,
    wallet: W,
}

impl<W> AuthFlow<W>
where
    W: WalletProvider + Sync,
{
    pub fn new(api: AuthApi, wallet: W) -> Self {
        Self { api, wallet }
    }

    pub fn api(&self) -> &AuthApi {
        &self.api
    }

    /// Run the whole sign-in, reporting progress through `on_status`.
    pub async fn login<F>(&self, mut on_status: F) -> Result<UserProfile, LoginError>
    where
        F: FnMut(LoginStatus) + Send,
    {
        match self.run(&mut on_status).await {
            Ok(user) => {
                on_status(LoginStatus::LoggedIn);
                tracing::info!(address = %user.address, "Signed in");
                Ok(user)
            }
            Err(err) => {
                tracing::error!(error = %err, "Login error");
                on_status(LoginStatus::Failed);
                Err(err)
            }
        }
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.api.logout().await
    }

    /// Profile of the current session, `None` when signed out
    pub async fn current_user(&self) -> Result<Option<UserProfile>, ClientError> {
        match self.api.me().await {
            Ok(user) => Ok(Some(user)),
            Err(err) if err.is_unauthorized() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn run<F>(&self, on_status: &mut F) -> Result<UserProfile, LoginError>
    where
        F: FnMut(LoginStatus) + Send,
    {
        on_status(LoginStatus::Connecting);
        let accounts = self
            .wallet
            .request_accounts()
            .await
            .map_err(|e| LoginError::at(LoginStage::Connect)(e.into()))?;
        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| LoginError::at(LoginStage::Connect)(WalletError::NoAccounts.into()))?;
        let chain_id = self
            .wallet
            .chain_id()
            .await
            .map_err(|e| LoginError::at(LoginStage::Connect)(e.into()))?;
        let address = account.to_checksum(None);

        on_status(LoginStatus::RequestingNonce);
        let nonce = self
            .api
            .nonce(&address)
            .await
            .map_err(LoginError::at(LoginStage::Nonce))?;

        let message = self.build_message(account, chain_id, &nonce, Utc::now()).to_string();

        on_status(LoginStatus::AwaitingSignature);
        let signature = self
            .wallet
            .sign_message(account, &message)
            .await
            .map_err(|e| LoginError::at(LoginStage::Sign)(e.into()))?;

        on_status(LoginStatus::Verifying);
        self.api
            .verify(&VerifyPayload {
                address: &address,
                message: &message,
                signature: &signature,
            })
            .await
            .map_err(LoginError::at(LoginStage::Verify))?;

        self.api
            .me()
            .await
            .map_err(LoginError::at(LoginStage::Profile))
    }

    /// SIWE message for this DApp's origin
    pub fn build_message(
        &self,
        account: Address,
        chain_id: u64,
        nonce: &str,
        issued_at: DateTime<Utc>,
    ) -> SiweMessage {
        let config = self.api.config();
        SiweMessage::new(
            config.domain(),
            account,
            config.uri(),
            chain_id,
            nonce,
            issued_at,
        )
        .with_statement(config.statement.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::wallet::KeyWallet;
    use chrono::TimeZone;

    #[test]
    fn test_status_text() {
        assert_eq!(LoginStatus::RequestingNonce.to_string(), "Requesting nonce from backend...");
        assert_eq!(LoginStatus::LoggedIn.as_str(), "Logged in!");
    }

    #[test]
    fn test_build_message() {
        let config = ClientConfig::new("http://localhost:3001", "http://localhost:5173").unwrap();
        let wallet = KeyWallet::random(1);
        let account = wallet.address();
        let flow = AuthFlow::new(AuthApi::new(config).unwrap(), wallet);

        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let message = flow.build_message(account, 1, "abc", issued_at);

        assert_eq!(message.domain, "localhost");
        assert_eq!(message.uri, "http://localhost:5173");
        assert_eq!(message.version, "1");
        assert_eq!(
            message.statement.as_deref(),
            Some("Sign in with Ethereum to the Rental DApp.")
        );
        assert_eq!(message.issued_at, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_login_error_text() {
        let err = LoginError::at(LoginStage::Verify)(ClientError::Api {
            status: 401,
            message: "Nonce mismatch".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Login failed during signature verification: server responded with 401: Nonce mismatch"
        );
    }
}
