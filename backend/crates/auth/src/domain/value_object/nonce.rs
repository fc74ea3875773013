//! Nonce Value Object
//!
//! One-time challenge embedded in the signed sign-in message.

use std::fmt;

use platform::crypto::{constant_time_eq, random_token};

/// 128 bits of CSPRNG output
pub const NONCE_BYTES: usize = 16;

#[derive(Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Fresh nonce: 16 random bytes, base64url without padding (22 chars)
    pub fn generate() -> Self {
        Self(random_token(NONCE_BYTES))
    }

    pub fn from_stored(value: String) -> Self {
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

    /// Constant-time comparison with the nonce found in a message
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

// Nonces are live credentials until consumed; keep them out of logs.
impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nonce(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let nonce = Nonce::generate();
        assert_eq!(nonce.as_str().len(), 22);
        assert!(
            nonce
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_is_unique() {
        let nonces: std::collections::HashSet<String> =
            (0..256).map(|_| Nonce::generate().into_inner()).collect();
        assert_eq!(nonces.len(), 256);
    }

    #[test]
    fn test_matches() {
        let nonce = Nonce::from_stored("abc".to_string());
        assert!(nonce.matches("abc"));
        assert!(!nonce.matches("abd"));
        assert!(!nonce.matches("ab"));
        assert_eq!(format!("{nonce:?}"), "Nonce(..)");
    }
}
