//! Login, token refresh and logout handlers.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::{Empty, LoginRequest, LogoutRequest, RefreshRequest, TokenResponse};
use crate::services::auth;

/// `POST /v1/login`: authenticate with username + password.
pub async fn login_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(
        state.users.as_ref(),
        state.refresh_tokens.as_ref(),
        &body.username,
        &body.password,
        &state.config.token,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /v1/refresh`: exchange a refresh token for a new token pair.
pub async fn refresh_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::refresh(
        state.refresh_tokens.as_ref(),
        &body.refresh_token,
        &state.config.token,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /v1/logout`: revoke a refresh token.
pub async fn logout_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<LogoutRequest>,
) -> AppResult<Json<Empty>> {
    auth::logout(state.refresh_tokens.as_ref(), &body.refresh_token).await?;
    Ok(Json(Empty {}))
}
