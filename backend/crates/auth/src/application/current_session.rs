//! Current Session Use Case
//!
//! Resolves the session cookie to the signed-in account.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::session_token::decode_session_token;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

pub struct CurrentSessionUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> CurrentSessionUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, token: Option<&str>, now: DateTime<Utc>) -> AuthResult<Account> {
        let token = token.ok_or(AuthError::Unauthenticated)?;
        let claims = decode_session_token(&self.config.session_secret, token, now)?;

        self.repo
            .find_by_id(&claims.account_id()?)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
