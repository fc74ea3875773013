//! Sign-In with Ethereum (EIP-4361)
//!
//! Message codec (canonical text <-> [`SiweMessage`]) and EIP-191 signer
//! recovery. Business checks (expected domain, stored nonce, claimed address)
//! belong to the caller; this module only answers "what does the message say"
//! and "who signed these bytes".

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, B256, Signature, eip191_hash_message, hex};
use chrono::{DateTime, Utc};

const SIWE_HEADER_SUFFIX: &str = " wants you to sign in with your Ethereum account:";

/// Errors raised while decoding a message or a signature
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiweError {
    #[error("invalid siwe message: {0}")]
    InvalidMessage(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,

    #[error("signature does not recover to a public key")]
    UnrecoverableSignature,

    #[error("message expired")]
    Expired,

    #[error("message not yet valid")]
    NotYetValid,
}

pub type SiweResult<T> = Result<T, SiweError>;

/// A parsed EIP-4361 message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiweMessage {
    pub domain: String,
    pub address: Address,
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: String,
    pub expiration_time: Option<String>,
    pub not_before: Option<String>,
    pub request_id: Option<String>,
    pub resources: Vec<String>,
}

impl SiweMessage {
    /// Message with the mandatory fields; version is always "1".
    pub fn new(
        domain: impl Into<String>,
        address: Address,
        uri: impl Into<String>,
        chain_id: u64,
        nonce: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            domain: domain.into(),
            address,
            statement: None,
            uri: uri.into(),
            version: "1".to_string(),
            chain_id,
            nonce: nonce.into(),
            issued_at: format_timestamp(issued_at),
            expiration_time: None,
            not_before: None,
            request_id: None,
            resources: Vec::new(),
        }
    }

    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    pub fn with_expiration_time(mut self, at: DateTime<Utc>) -> Self {
        self.expiration_time = Some(format_timestamp(at));
        self
    }

    pub fn with_not_before(mut self, at: DateTime<Utc>) -> Self {
        self.not_before = Some(format_timestamp(at));
        self
    }

    /// Reject the message when `now` falls outside `notBefore..expirationTime`.
    pub fn check_time_window(&self, now: DateTime<Utc>) -> SiweResult<()> {
        if let Some(raw) = &self.expiration_time {
            if now >= parse_timestamp("expiration time", raw)? {
                return Err(SiweError::Expired);
            }
        }
        if let Some(raw) = &self.not_before {
            if now < parse_timestamp("not before", raw)? {
                return Err(SiweError::NotYetValid);
            }
        }
        Ok(())
    }
}

impl FromStr for SiweMessage {
    type Err = SiweError;

    fn from_str(raw: &str) -> SiweResult<Self> {
        parse_siwe_message(raw)
    }
}

/// Canonical EIP-4361 text; this exact string is what wallets sign.
impl fmt::Display for SiweMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}{}", self.domain, SIWE_HEADER_SUFFIX)?;
        writeln!(f, "{}", self.address.to_checksum(None))?;
        writeln!(f)?;
        if let Some(statement) = &self.statement {
            writeln!(f, "{statement}")?;
        }
        writeln!(f)?;
        writeln!(f, "URI: {}", self.uri)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        writeln!(f, "Nonce: {}", self.nonce)?;
        write!(f, "Issued At: {}", self.issued_at)?;
        if let Some(value) = &self.expiration_time {
            write!(f, "\nExpiration Time: {value}")?;
        }
        if let Some(value) = &self.not_before {
            write!(f, "\nNot Before: {value}")?;
        }
        if let Some(value) = &self.request_id {
            write!(f, "\nRequest ID: {value}")?;
        }
        if !self.resources.is_empty() {
            write!(f, "\nResources:")?;
            for resource in &self.resources {
                write!(f, "\n- {resource}")?;
            }
        }
        Ok(())
    }
}

pub fn parse_siwe_message(raw: &str) -> SiweResult<SiweMessage> {
    let lines: Vec<&str> = raw.lines().collect();
    if lines.len() < 2 {
        return Err(invalid("message must include header and address"));
    }

    let domain = lines[0]
        .trim()
        .strip_suffix(SIWE_HEADER_SUFFIX)
        .ok_or_else(|| invalid("invalid header line"))?
        .trim()
        .to_string();
    if domain.is_empty() {
        return Err(invalid("missing domain"));
    }

    let address = parse_address(lines[1])?;

    let mut index = 2;
    while index < lines.len() && lines[index].trim().is_empty() {
        index += 1;
    }

    let mut statement = None;
    if let Some(candidate) = lines.get(index).map(|line| line.trim()) {
        if !candidate.starts_with("URI:") {
            statement = Some(candidate.to_string());
            index += 1;
        }
    }

    let mut uri = None;
    let mut version = None;
    let mut chain_id = None;
    let mut nonce = None;
    let mut issued_at = None;
    let mut expiration_time = None;
    let mut not_before = None;
    let mut request_id = None;
    let mut resources = Vec::new();

    let mut rest = lines[index..].iter().map(|line| line.trim());
    while let Some(line) = rest.next() {
        if line.is_empty() {
            continue;
        }
        if line == "Resources:" {
            resources.extend(
                rest.by_ref()
                    .filter_map(|res| res.strip_prefix("- "))
                    .map(|res| res.trim().to_string()),
            );
            break;
        }

        if let Some(value) = parse_field(line, "URI:") {
            uri = Some(value.to_string());
        } else if let Some(value) = parse_field(line, "Version:") {
            version = Some(value.to_string());
        } else if let Some(value) = parse_field(line, "Chain ID:") {
            chain_id = Some(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid("invalid chain id"))?,
            );
        } else if let Some(value) = parse_field(line, "Nonce:") {
            nonce = Some(value.to_string());
        } else if let Some(value) = parse_field(line, "Issued At:") {
            issued_at = Some(value.to_string());
        } else if let Some(value) = parse_field(line, "Expiration Time:") {
            expiration_time = Some(value.to_string());
        } else if let Some(value) = parse_field(line, "Not Before:") {
            not_before = Some(value.to_string());
        } else if let Some(value) = parse_field(line, "Request ID:") {
            request_id = Some(value.to_string());
        }
    }

    let nonce = nonce.ok_or_else(|| invalid("missing nonce"))?;
    if nonce.is_empty() {
        return Err(invalid("empty nonce"));
    }

    Ok(SiweMessage {
        domain,
        address,
        statement,
        uri: uri.ok_or_else(|| invalid("missing uri"))?,
        version: version.ok_or_else(|| invalid("missing version"))?,
        chain_id: chain_id.ok_or_else(|| invalid("missing chain id"))?,
        nonce,
        issued_at: issued_at.ok_or_else(|| invalid("missing issued at"))?,
        expiration_time,
        not_before,
        request_id,
        resources,
    })
}

/// Recover the address that produced `signature_hex` over `raw_message`
/// (EIP-191 personal-sign hashing).
pub fn recover_signer(raw_message: &str, signature_hex: &str) -> SiweResult<Address> {
    let bytes = hex::decode(signature_hex.trim()).map_err(|_| SiweError::InvalidSignatureEncoding)?;
    let signature =
        Signature::try_from(bytes.as_slice()).map_err(|_| SiweError::InvalidSignatureEncoding)?;

    signature
        .recover_address_from_prehash(&message_hash(raw_message))
        .map_err(|_| SiweError::UnrecoverableSignature)
}

/// Parse a hex address in any letter case
pub fn parse_address(raw: &str) -> SiweResult<Address> {
    Address::from_str(raw.trim()).map_err(|_| SiweError::InvalidAddress(raw.trim().to_string()))
}

/// EIP-55 mixed-case form of `raw`
pub fn checksum_address(raw: &str) -> SiweResult<String> {
    parse_address(raw).map(|address| address.to_checksum(None))
}

/// RFC 3339 with millisecond precision and `Z`, matching browser `toISOString()`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn message_hash(raw_message: &str) -> B256 {
    eip191_hash_message(raw_message.as_bytes())
}

fn parse_timestamp(label: &str, raw: &str) -> SiweResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| invalid(&format!("invalid {label} timestamp")))
}

fn parse_field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key).map(str::trim)
}

fn invalid(msg: &str) -> SiweError {
    SiweError::InvalidMessage(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;
    use chrono::{Duration, TimeZone};

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn sample(address: Address) -> SiweMessage {
        SiweMessage::new(
            "localhost",
            address,
            "http://localhost:5173",
            1,
            "n0nce-Value_1",
            issued_at(),
        )
        .with_statement("Sign in with Ethereum to the Rental DApp.")
    }

    #[test]
    fn test_canonical_text() {
        let address = parse_address("0x52908400098527886e0f7030069857d2e4169ee7").unwrap();
        let text = sample(address).to_string();

        assert_eq!(
            text,
            "localhost wants you to sign in with your Ethereum account:\n\
             0x52908400098527886E0F7030069857D2E4169EE7\n\
             \n\
             Sign in with Ethereum to the Rental DApp.\n\
             \n\
             URI: http://localhost:5173\n\
             Version: 1\n\
             Chain ID: 1\n\
             Nonce: n0nce-Value_1\n\
             Issued At: 2024-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn test_parse_canonical_text() {
        let signer = PrivateKeySigner::random();
        let message = sample(signer.address())
            .with_expiration_time(issued_at() + Duration::minutes(10));
        let parsed: SiweMessage = message.to_string().parse().unwrap();
        assert_eq!(parsed, message);
    }

    #[test]
    fn test_parse_without_statement_and_with_resources() {
        let raw = "example.com wants you to sign in with your Ethereum account:\n\
                   0x52908400098527886E0F7030069857D2E4169EE7\n\
                   \n\
                   \n\
                   URI: https://example.com\n\
                   Version: 1\n\
                   Chain ID: 11155111\n\
                   Nonce: abc\n\
                   Issued At: 2024-01-01T00:00:00Z\n\
                   Request ID: req-7\n\
                   Resources:\n\
                   - ipfs://one\n\
                   - https://two";
        let parsed = parse_siwe_message(raw).unwrap();

        assert_eq!(parsed.domain, "example.com");
        assert_eq!(parsed.statement, None);
        assert_eq!(parsed.chain_id, 11155111);
        assert_eq!(parsed.request_id.as_deref(), Some("req-7"));
        assert_eq!(parsed.resources, vec!["ipfs://one", "https://two"]);
        assert_eq!(parsed.to_string(), raw);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_siwe_message("hello"),
            Err(SiweError::InvalidMessage(_))
        ));
        assert!(matches!(
            parse_siwe_message("not a header\n0x52908400098527886E0F7030069857D2E4169EE7"),
            Err(SiweError::InvalidMessage(_))
        ));
        assert!(matches!(
            parse_siwe_message("a wants you to sign in with your Ethereum account:\nnope"),
            Err(SiweError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_parse_requires_nonce() {
        let raw = "a.com wants you to sign in with your Ethereum account:\n\
                   0x52908400098527886E0F7030069857D2E4169EE7\n\n\n\
                   URI: https://a.com\nVersion: 1\nChain ID: 1\nIssued At: 2024-01-01T00:00:00Z";
        assert_eq!(
            parse_siwe_message(raw),
            Err(SiweError::InvalidMessage("missing nonce".to_string()))
        );
    }

    #[test]
    fn test_recover_signer() {
        let signer = PrivateKeySigner::random();
        let text = sample(signer.address()).to_string();
        let signature = signer.sign_message_sync(text.as_bytes()).unwrap();
        let signature_hex = hex::encode_prefixed(signature.as_bytes());

        assert_eq!(recover_signer(&text, &signature_hex).unwrap(), signer.address());

        // Any change to the signed text yields a different signer
        let tampered = text.replace("Chain ID: 1", "Chain ID: 2");
        assert_ne!(
            recover_signer(&tampered, &signature_hex).ok(),
            Some(signer.address())
        );
    }

    #[test]
    fn test_recover_signer_rejects_bad_encoding() {
        assert_eq!(
            recover_signer("msg", "0xzz"),
            Err(SiweError::InvalidSignatureEncoding)
        );
        assert_eq!(
            recover_signer("msg", "0x1234"),
            Err(SiweError::InvalidSignatureEncoding)
        );
    }

    #[test]
    fn test_time_window() {
        let message = sample(Address::ZERO)
            .with_not_before(issued_at())
            .with_expiration_time(issued_at() + Duration::minutes(5));

        assert_eq!(
            message.check_time_window(issued_at() - Duration::seconds(1)),
            Err(SiweError::NotYetValid)
        );
        assert!(message.check_time_window(issued_at() + Duration::minutes(1)).is_ok());
        assert_eq!(
            message.check_time_window(issued_at() + Duration::minutes(5)),
            Err(SiweError::Expired)
        );

        // No window at all: always fine
        assert!(sample(Address::ZERO).check_time_window(Utc::now()).is_ok());
    }

    #[test]
    fn test_checksum_address() {
        assert_eq!(
            checksum_address("0x52908400098527886e0f7030069857d2e4169ee7").unwrap(),
            "0x52908400098527886E0F7030069857D2E4169EE7"
        );
        assert!(checksum_address("0x1234").is_err());
    }
}
