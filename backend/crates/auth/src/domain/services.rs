//! Domain Services
//!
//! Pure sign-in checks over a parsed SIWE message. No I/O.

use chrono::{DateTime, Utc};
use platform::siwe::{self, SiweMessage};

use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};
use crate::error::{AuthError, AuthResult};

/// What the server expects a sign-in message to carry
pub struct SignInExpectation<'a> {
    pub domain: &'a str,
    pub nonce: &'a Nonce,
    pub address: &'a WalletAddress,
    pub now: DateTime<Utc>,
}

/// Run every check in order, stopping at the first failure:
/// domain, nonce, validity window, signature, claimed address.
///
/// `raw_message` must be the exact text that was signed.
pub fn verify_sign_in(
    message: &SiweMessage,
    raw_message: &str,
    signature: &str,
    expected: &SignInExpectation<'_>,
) -> AuthResult<()> {
    if message.domain != expected.domain {
        return Err(AuthError::DomainMismatch);
    }

    if !expected.nonce.matches(&message.nonce) {
        return Err(AuthError::NonceMismatch);
    }

    message.check_time_window(expected.now)?;

    let signer = siwe::recover_signer(raw_message, signature)?;
    if signer != message.address {
        return Err(AuthError::InvalidSignature);
    }

    if !expected.address.matches(&message.address) {
        return Err(AuthError::AddressMismatch);
    }

    Ok(())
}
