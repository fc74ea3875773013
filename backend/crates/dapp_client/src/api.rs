//! Auth Backend API
//!
//! Thin wrapper over the backend routes. The session lives in an HttpOnly
//! cookie, so the underlying client keeps a cookie store.

use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct VerifyPayload<'a> {
    pub address: &'a str,
    pub message: &'a str,
    pub signature: &'a str,
}

#[derive(Deserialize)]
struct NonceReply {
    nonce: String,
}

#[derive(Deserialize)]
struct OkReply {
    #[serde(default)]
    ok: bool,
}

#[derive(Deserialize)]
struct MeReply {
    user: UserProfile,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

#[derive(Clone)]
pub struct AuthApi {
    http: Client,
    config: ClientConfig,
}

impl AuthApi {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST /auth/nonce
    pub async fn nonce(&self, address: &str) -> ClientResult<String> {
        let response = self
            .http
            .post(self.config.endpoint("auth/nonce")?)
            .json(&serde_json::json!({ "address": address }))
            .send()
            .await?;
        Ok(read_json::<NonceReply>(response).await?.nonce)
    }

    /// POST /auth/verify; on success the session cookie is stored.
    pub async fn verify(&self, payload: &VerifyPayload<'_>) -> ClientResult<()> {
        let response = self
            .http
            .post(self.config.endpoint("auth/verify")?)
            .json(payload)
            .send()
            .await?;
        expect_ok(read_json(response).await?)
    }

    /// GET /me
    pub async fn me(&self) -> ClientResult<UserProfile> {
        let response = self.http.get(self.config.endpoint("me")?).send().await?;
        Ok(read_json::<MeReply>(response).await?.user)
    }

    /// POST /logout
    pub async fn logout(&self) -> ClientResult<()> {
        let response = self.http.post(self.config.endpoint("logout")?).send().await?;
        expect_ok(read_json(response).await?)
    }

    /// GET /health
    pub async fn health(&self) -> ClientResult<bool> {
        let response = self.http.get(self.config.endpoint("health")?).send().await?;
        Ok(read_json::<OkReply>(response).await?.ok)
    }
}

fn expect_ok(reply: OkReply) -> ClientResult<()> {
    if reply.ok {
        Ok(())
    } else {
        Err(ClientError::UnexpectedResponse("missing ok flag".to_string()))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorReply>(&body)
        .map(|reply| reply.error)
        .unwrap_or(body);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
