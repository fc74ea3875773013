//! Account Entity
//!
//! Per-address state tracked by the session store. Created on the first
//! nonce request, mutated on every nonce request and every successful
//! sign-in, never deleted.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};

#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    /// Unique, lowercase
    pub address: WalletAddress,
    /// Only the latest issued nonce is valid
    pub nonce: Nonce,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// First contact for an address
    pub fn new(address: WalletAddress, nonce: Nonce, now: DateTime<Utc>) -> Self {
        Self {
            id: AccountId::new(),
            address,
            nonce,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// A nonce request on an existing account
    pub fn reissue_nonce(&mut self, nonce: Nonce, now: DateTime<Utc>) {
        self.nonce = nonce;
        self.updated_at = now;
    }

    /// Successful sign-in: consume the nonce by replacing it.
    pub fn record_login(&mut self, next_nonce: Nonce, now: DateTime<Utc>) {
        self.nonce = next_nonce;
        self.last_login_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_lifecycle() {
        let now = Utc::now();
        let address = WalletAddress::parse("0xABC1").unwrap();
        let mut account = Account::new(address, Nonce::from_stored("n1".into()), now);
        assert_eq!(account.created_at, account.updated_at);
        assert!(account.last_login_at.is_none());

        let later = now + Duration::seconds(5);
        account.reissue_nonce(Nonce::from_stored("n2".into()), later);
        assert!(account.nonce.matches("n2"));
        assert_eq!(account.updated_at, later);
        assert_eq!(account.created_at, now);

        let login = later + Duration::seconds(5);
        account.record_login(Nonce::from_stored("n3".into()), login);
        assert!(account.nonce.matches("n3"));
        assert_eq!(account.last_login_at, Some(login));
        assert_eq!(account.updated_at, later);
    }
}
