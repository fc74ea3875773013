//! Server Configuration
//!
//! Read once at startup from the process environment (after `.env`).

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::{AuthConfig, FailedVerifyPolicy};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const MAX_SESSION_TTL_DAYS: u64 = 3650;
const SECS_PER_DAY: u64 = 24 * 3600;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Unset means the in-memory account store
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub frontend_origins: Vec<String>,
    pub production: bool,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let production = get("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().context("PORT must be a port number")?,
            None => DEFAULT_PORT,
        };

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let mut auth = if production {
            let secret = get("JWT_SECRET").context("JWT_SECRET must be set in production")?;
            if secret.len() < 32 {
                bail!("JWT_SECRET must be at least 32 bytes");
            }
            AuthConfig {
                session_secret: secret.into_bytes(),
                ..AuthConfig::default()
            }
        } else {
            match get("JWT_SECRET") {
                Some(secret) => AuthConfig {
                    session_secret: secret.into_bytes(),
                    cookie_secure: false,
                    ..AuthConfig::default()
                },
                None => AuthConfig::development(),
            }
        };

        if let Some(domain) = get("DOMAIN") {
            auth.domain = domain.trim().to_string();
        }
        if let Some(days) = get("SESSION_TTL_DAYS") {
            let days: u64 = days
                .trim()
                .parse()
                .context("SESSION_TTL_DAYS must be a whole number of days")?;
            if days == 0 || days > MAX_SESSION_TTL_DAYS {
                bail!("SESSION_TTL_DAYS must be between 1 and {MAX_SESSION_TTL_DAYS}, got {days}");
            }
            let secs = days
                .checked_mul(SECS_PER_DAY)
                .context("SESSION_TTL_DAYS is too large")?;
            auth.session_ttl = Duration::from_secs(secs);
        }
        if let Some(policy) = get("FAILED_VERIFY_POLICY") {
            auth.failed_verify_policy = match policy.trim() {
                "preserve" => FailedVerifyPolicy::PreserveNonce,
                "rotate" => FailedVerifyPolicy::RotateNonce,
                other => bail!("FAILED_VERIFY_POLICY must be preserve or rotate, got {other}"),
            };
        }

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            db_max_connections,
            frontend_origins,
            production,
            auth,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
