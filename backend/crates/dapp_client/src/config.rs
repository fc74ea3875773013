//! Client Configuration

use std::time::Duration;

use reqwest::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_STATEMENT: &str = "Sign in with Ethereum to the Rental DApp.";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Auth backend base URL
    pub api_base: Url,
    /// Origin the DApp is served from; its host becomes the SIWE domain
    pub origin: Url,
    pub statement: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base: &str, origin: &str) -> ClientResult<Self> {
        let mut api_base = Url::parse(api_base)
            .map_err(|e| ClientError::Config(format!("api base url: {e}")))?;
        if api_base.cannot_be_a_base() {
            return Err(ClientError::Config("api base url cannot be a base".to_string()));
        }
        // Endpoints are joined relative to the base, so its path must end in '/'
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }
        let origin =
            Url::parse(origin).map_err(|e| ClientError::Config(format!("origin url: {e}")))?;
        if origin.host_str().is_none() {
            return Err(ClientError::Config("origin must have a host".to_string()));
        }

        Ok(Self {
            api_base,
            origin,
            statement: DEFAULT_STATEMENT.to_string(),
            request_timeout: Duration::from_secs(15),
        })
    }

    /// Local development: backend on :3001, DApp on :5173
    pub fn development() -> ClientResult<Self> {
        Self::new("http://localhost:3001", "http://localhost:5173")
    }

    /// SIWE `domain`: host name of the origin
    pub fn domain(&self) -> &str {
        self.origin.host_str().unwrap_or_default()
    }

    /// SIWE `uri`: serialized origin (scheme, host, port)
    pub fn uri(&self) -> String {
        self.origin.origin().ascii_serialization()
    }

    pub(crate) fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.api_base
            .join(path)
            .map_err(|e| ClientError::Config(format!("endpoint {path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_and_uri() {
        let config = ClientConfig::new("http://localhost:3001", "http://localhost:5173/app").unwrap();
        assert_eq!(config.domain(), "localhost");
        assert_eq!(config.uri(), "http://localhost:5173");
        assert_eq!(
            config.endpoint("auth/nonce").unwrap().as_str(),
            "http://localhost:3001/auth/nonce"
        );
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let config = ClientConfig::new("http://localhost:3001/api", "http://localhost:5173").unwrap();
        assert_eq!(config.api_base.as_str(), "http://localhost:3001/api/");
        assert_eq!(
            config.endpoint("auth/nonce").unwrap().as_str(),
            "http://localhost:3001/api/auth/nonce"
        );

        let config = ClientConfig::new("http://localhost:3001/api/", "http://localhost:5173").unwrap();
        assert_eq!(
            config.endpoint("me").unwrap().as_str(),
            "http://localhost:3001/api/me"
        );
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            ClientConfig::new("not a url", "http://localhost"),
            Err(ClientError::Config(_))
        ));
        assert!(ClientConfig::new("http://localhost:3001", "data:text/plain,hi").is_err());
        assert!(ClientConfig::new("mailto:ops@rental.example", "http://localhost").is_err());
    }
}
