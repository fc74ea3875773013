//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use platform::cookie::{extract_cookie, set_cookie_header};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CurrentSessionUseCase, RequestNonceInput, RequestNonceUseCase, VerifySignInInput,
    VerifySignInUseCase,
};
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    MeResponse, NonceRequest, NonceResponse, OkResponse, SignedMessage, VerifyRequest,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Handshake
// ============================================================================

/// POST /auth/nonce
pub async fn request_nonce<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<NonceRequest>, JsonRejection>,
) -> AuthResult<Json<NonceResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable nonce request");
        AuthError::AddressRequired
    })?;

    let use_case = RequestNonceUseCase::new(state.repo.clone());

    let input = RequestNonceInput {
        address: req.address.unwrap_or_default(),
    };

    let output = use_case.execute(input, Utc::now()).await?;

    Ok(Json(NonceResponse {
        nonce: output.nonce,
    }))
}

/// POST /auth/verify
pub async fn verify<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable verify request");
        AuthError::MissingParams
    })?;

    let message = req
        .message
        .map(SignedMessage::into_text)
        .transpose()?
        .unwrap_or_default();

    let input = VerifySignInInput {
        address: req.address.unwrap_or_default(),
        message,
        signature: req.signature.unwrap_or_default(),
    };

    let use_case = VerifySignInUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(input, Utc::now()).await?;

    let cookie = state
        .config
        .session_cookie()
        .build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(OkResponse::ok()),
    ))
}

// ============================================================================
// Session
// ============================================================================

/// GET /me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<MeResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = CurrentSessionUseCase::new(state.repo.clone(), state.config.clone());
    let account = use_case.execute(token.as_deref(), Utc::now()).await?;

    Ok(Json(MeResponse {
        user: account.into(),
    }))
}

/// POST /logout
///
/// Stateless tokens: clearing the cookie is all there is to do.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let cookie = state.config.session_cookie().build_delete_cookie();

    (
        StatusCode::OK,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(OkResponse::ok()),
    )
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
pub async fn health() -> Json<OkResponse> {
    Json(OkResponse::ok())
}

/// GET /ready
pub async fn ready<R>(State(state): State<AuthAppState<R>>) -> AuthResult<Json<OkResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    state.repo.ping().await.map_err(|e| match e {
        AuthError::StoreUnavailable(_) => e,
        other => AuthError::StoreUnavailable(other.to_string()),
    })?;

    Ok(Json(OkResponse::ok()))
}
