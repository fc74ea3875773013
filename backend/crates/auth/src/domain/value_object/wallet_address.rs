//! WalletAddress Value Object
//!
//! Normalized (lowercase) Ethereum address used as the account key.
//! Beyond presence no format is enforced here; the SIWE signature check is
//! what proves the address is real and owned.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::wallet_address::WalletAddress;
//!
//! let address = WalletAddress::parse(" 0xAbC1 ").unwrap();
//! assert_eq!(address.as_str(), "0xabc1");
//! ```

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Trim and lowercase ASCII letters; empty input is [`AuthError::AddressRequired`].
    pub fn parse(raw: &str) -> AuthResult<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(AuthError::AddressRequired);
        }
        Ok(Self(normalized))
    }

    /// Wrap a value that is already normalized (e.g. read back from the store)
    pub fn from_normalized(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Case-insensitive comparison against a parsed address
    pub fn matches(&self, address: &Address) -> bool {
        self.0 == lowercase_hex(address)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Address> for WalletAddress {
    fn from(address: &Address) -> Self {
        Self(lowercase_hex(address))
    }
}

fn lowercase_hex(address: &Address) -> String {
    address.to_checksum(None).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_lowercases() {
        let address = WalletAddress::parse("0x52908400098527886E0F7030069857D2E4169EE7").unwrap();
        assert_eq!(address.as_str(), "0x52908400098527886e0f7030069857d2e4169ee7");
    }

    #[test]
    fn test_parse_only_folds_ascii() {
        let address = WalletAddress::parse("0xÄBC").unwrap();
        assert_eq!(address.as_str(), "0xÄbc");
        assert!(!address.as_str().chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(WalletAddress::parse(""), Err(AuthError::AddressRequired)));
        assert!(matches!(WalletAddress::parse("   "), Err(AuthError::AddressRequired)));
    }

    #[test]
    fn test_matches_ignores_case() {
        let parsed = Address::from_str("0x52908400098527886E0F7030069857D2E4169EE7").unwrap();
        let upper = WalletAddress::parse("0x52908400098527886E0F7030069857D2E4169EE7").unwrap();
        assert!(upper.matches(&parsed));
        assert_eq!(WalletAddress::from(&parsed), upper);

        let other = WalletAddress::parse("0x0000000000000000000000000000000000000001").unwrap();
        assert!(!other.matches(&parsed));
    }
}
