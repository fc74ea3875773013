//! Wallet Abstraction
//!
//! The browser wallet is an external collaborator; the flow only needs to
//! list accounts, read the chain id and sign a personal message.

use alloy_primitives::{Address, hex};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::error::WalletError;

#[trait_variant::make(WalletProvider: Send)]
pub trait LocalWalletProvider {
    /// Accounts the user allowed this DApp to see (`eth_requestAccounts`)
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// EIP-191 personal signature over `message`, hex encoded
    async fn sign_message(&self, account: Address, message: &str) -> Result<String, WalletError>;
}

/// Wallet backed by a local private key
#[derive(Debug, Clone)]
pub struct KeyWallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl KeyWallet {
    pub fn new(signer: PrivateKeySigner, chain_id: u64) -> Self {
        Self { signer, chain_id }
    }

    pub fn random(chain_id: u64) -> Self {
        Self::new(PrivateKeySigner::random(), chain_id)
    }

    /// Hex private key, with or without `0x`
    pub fn from_private_key(key: &str, chain_id: u64) -> Result<Self, WalletError> {
        let signer = key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|e| WalletError::Signing(format!("invalid private key: {e}")))?;
        Ok(Self::new(signer, chain_id))
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl WalletProvider for KeyWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.signer.address()])
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id)
    }

    async fn sign_message(&self, account: Address, message: &str) -> Result<String, WalletError> {
        if account != self.signer.address() {
            return Err(WalletError::UnknownAccount(account.to_checksum(None)));
        }
        let signature = self
            .signer
            .sign_message_sync(message.as_bytes())
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyWallet, WalletProvider};
    use crate::error::WalletError;
    use alloy_primitives::Address;
    use platform::siwe::recover_signer;

    #[tokio::test]
    async fn test_key_wallet_signs_for_itself() {
        let wallet = KeyWallet::random(11155111);
        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(accounts, vec![wallet.address()]);
        assert_eq!(wallet.chain_id().await.unwrap(), 11155111);

        let signature = wallet.sign_message(wallet.address(), "hello").await.unwrap();
        assert_eq!(recover_signer("hello", &signature).unwrap(), wallet.address());
    }

    #[tokio::test]
    async fn test_key_wallet_rejects_foreign_account() {
        let wallet = KeyWallet::random(1);
        let result = wallet.sign_message(Address::ZERO, "hello").await;
        assert!(matches!(result, Err(WalletError::UnknownAccount(_))));
    }

    #[test]
    fn test_from_private_key() {
        let wallet = KeyWallet::from_private_key(
            "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
            1,
        )
        .unwrap();
        assert_eq!(
            wallet.address().to_checksum(None),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
        );
        assert!(KeyWallet::from_private_key("zz", 1).is_err());
    }
}
