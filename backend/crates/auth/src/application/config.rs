//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Re-export SameSite from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// What happens to the stored nonce when a signed message is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailedVerifyPolicy {
    /// Leave the nonce in place so the client can retry with a new signature
    #[default]
    PreserveNonce,
    /// Issue a fresh nonce; the client must restart the handshake
    RotateNonce,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Domain the SIWE message must be bound to (host, optionally with port)
    pub domain: String,
    /// Session cookie name
    pub session_cookie_name: String,
    /// HS256 key for session tokens
    pub session_secret: Vec<u8>,
    /// Session token lifetime, also the cookie Max-Age
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    pub failed_verify_policy: FailedVerifyPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            session_cookie_name: "token".to_string(),
            session_secret: Vec::new(),
            session_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            failed_verify_policy: FailedVerifyPolicy::PreserveNonce,
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_failed_verify_policy(mut self, policy: FailedVerifyPolicy) -> Self {
        self.failed_verify_policy = policy;
        self
    }

    /// Cookie attributes for the session cookie
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs()),
        }
    }

    /// Session TTL as a chrono duration
    pub fn session_ttl_chrono(&self) -> AuthResult<chrono::Duration> {
        chrono::Duration::from_std(self.session_ttl)
            .map_err(|_| AuthError::Internal("session ttl out of range".to_string()))
    }
}
