//! API DTOs (Data Transfer Objects)
//!
//! Request fields are optional so that absent values reach the use cases and
//! produce the documented 400s instead of a generic extractor rejection.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::siwe::{self, SiweMessage};
use serde::{Deserialize, Serialize};

use crate::domain::entity::account::Account;
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Nonce
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NonceRequest {
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NonceResponse {
    pub nonce: String,
}

// ============================================================================
// Verify
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub message: Option<SignedMessage>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// The signed message, either as the exact text or as its fields
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignedMessage {
    Text(String),
    Fields(SiweMessageFields),
    /// Any other JSON value; rejected as malformed once the request is read
    Unrecognized(serde_json::Value),
}

impl SignedMessage {
    /// Canonical text that the signature must cover
    pub fn into_text(self) -> AuthResult<String> {
        match self {
            SignedMessage::Text(text) => Ok(text),
            SignedMessage::Fields(fields) => Ok(SiweMessage::try_from(fields)?.to_string()),
            SignedMessage::Unrecognized(value) => {
                let reason = match serde_json::from_value::<SiweMessageFields>(value) {
                    Err(e) => e.to_string(),
                    Ok(_) => "unsupported message shape".to_string(),
                };
                Err(AuthError::MalformedMessage(reason))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiweMessageFields {
    pub domain: String,
    pub address: String,
    #[serde(default)]
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: String,
    #[serde(default)]
    pub expiration_time: Option<String>,
    #[serde(default)]
    pub not_before: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl TryFrom<SiweMessageFields> for SiweMessage {
    type Error = AuthError;

    fn try_from(fields: SiweMessageFields) -> AuthResult<Self> {
        Ok(SiweMessage {
            domain: fields.domain,
            address: siwe::parse_address(&fields.address)?,
            statement: fields.statement,
            uri: fields.uri,
            version: fields.version,
            chain_id: fields.chain_id,
            nonce: fields.nonce,
            issued_at: fields.issued_at,
            expiration_time: fields.expiration_time,
            not_before: fields.not_before,
            request_id: fields.request_id,
            resources: fields.resources,
        })
    }
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Account as exposed to clients; the nonce never leaves the server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: AccountId,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<Account> for UserProfile {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            address: account.address.into_inner(),
            created_at: account.created_at,
            updated_at: account.updated_at,
            last_login_at: account.last_login_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};

    #[test]
    fn test_verify_request_accepts_text_and_fields() {
        let req: VerifyRequest = serde_json::from_value(serde_json::json!({
            "address": "0xab",
            "message": "some text",
            "signature": "0x00"
        }))
        .unwrap();
        assert!(matches!(req.message, Some(SignedMessage::Text(_))));

        let req: VerifyRequest = serde_json::from_value(serde_json::json!({
            "address": "0x52908400098527886e0f7030069857d2e4169ee7",
            "message": {
                "domain": "localhost",
                "address": "0x52908400098527886e0f7030069857d2e4169ee7",
                "statement": "Sign in with Ethereum to the Rental DApp.",
                "uri": "http://localhost:5173",
                "version": "1",
                "chainId": 1,
                "nonce": "abc",
                "issuedAt": "2024-01-01T00:00:00.000Z"
            },
            "signature": "0x00"
        }))
        .unwrap();
        let text = req.message.unwrap().into_text().unwrap();
        assert!(text.starts_with("localhost wants you to sign in with your Ethereum account:\n"));
        assert!(text.contains("0x52908400098527886E0F7030069857D2E4169EE7"));
        assert!(text.contains("\nNonce: abc\n"));
    }

    #[test]
    fn test_fields_with_bad_address() {
        let fields: SiweMessageFields = serde_json::from_value(serde_json::json!({
            "domain": "localhost",
            "address": "nope",
            "uri": "http://localhost",
            "version": "1",
            "chainId": 1,
            "nonce": "abc",
            "issuedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(matches!(
            SignedMessage::Fields(fields).into_text(),
            Err(AuthError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_incomplete_fields_are_malformed() {
        let req: VerifyRequest = serde_json::from_value(serde_json::json!({
            "address": "0xab",
            "message": { "domain": "localhost" },
            "signature": "0x00"
        }))
        .unwrap();
        let message = req.message.unwrap();
        assert!(matches!(message, SignedMessage::Unrecognized(_)));
        match message.into_text() {
            Err(AuthError::MalformedMessage(reason)) => assert!(reason.contains("missing field")),
            other => panic!("expected malformed message, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_parses() {
        let req: VerifyRequest = serde_json::from_str("{}").unwrap();
        assert!(req.address.is_none() && req.message.is_none() && req.signature.is_none());
    }

    #[test]
    fn test_profile_has_no_nonce() {
        let account = Account::new(
            WalletAddress::parse("0xab").unwrap(),
            Nonce::generate(),
            Utc::now(),
        );
        let json = serde_json::to_value(MeResponse {
            user: account.into(),
        })
        .unwrap();
        let user = json["user"].as_object().unwrap();
        assert!(!user.contains_key("nonce"));
        assert_eq!(user["address"], "0xab");
        assert!(user.contains_key("createdAt"));
        assert!(user["lastLoginAt"].is_null());
    }
}
