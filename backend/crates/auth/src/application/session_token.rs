//! Session Tokens
//!
//! HS256 JWTs carried in the session cookie. Stateless: nothing is stored
//! server side, so a token stays valid until it expires.
//!
//! Expiry is checked against an explicit `now` so validation is a pure
//! function of (secret, token, time).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::AccountId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::account::Account;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account id
    pub sub: String,
    /// Normalized wallet address
    pub address: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn account_id(&self) -> AuthResult<AccountId> {
        self.sub.parse().map_err(|_| AuthError::SessionInvalid)
    }
}

/// Sign a session token for `account`, valid for `ttl` from `now`.
pub fn issue_session_token(
    secret: &[u8],
    account: &Account,
    now: DateTime<Utc>,
    ttl: Duration,
) -> AuthResult<String> {
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Internal("session expiry out of range".to_string()))?;
    let claims = SessionClaims {
        sub: account.id.to_string(),
        address: account.address.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

/// Check signature and expiry of `token` at time `now`.
///
/// Bad signature or structure is [`AuthError::SessionInvalid`]; a token past
/// its `exp` is [`AuthError::SessionExpired`].
pub fn decode_session_token(
    secret: &[u8],
    token: &str,
    now: DateTime<Utc>,
) -> AuthResult<SessionClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|_| AuthError::SessionInvalid)?
        .claims;

    if now.timestamp() >= claims.exp {
        return Err(AuthError::SessionExpired);
    }

    Ok(claims)
}
