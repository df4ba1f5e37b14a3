//! Authentication context middleware: bearer token extraction and JWT verification.
//!
//! Runs on every `/v1` request and never rejects: a missing, malformed or
//! expired token simply leaves the request without an identity. Whether
//! that is acceptable is decided later by the authorization gate.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use clinic_core::auth::jwt::verify_access_token;
use clinic_core::models::auth::{Identity, Role};
use tracing::debug;

use crate::AppState;

/// Request-scoped caller identity.
///
/// Extract it in any handler; an unauthenticated request yields an empty
/// context rather than a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext(Option<Identity>);

impl AuthContext {
    pub fn new(identity: Option<Identity>) -> Self {
        Self(identity)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.0.as_ref().map(|i| i.role)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.0.as_ref().map(|i| i.user_id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<AuthContext>().cloned().unwrap_or_default())
    }
}

const BEARER: &str = "bearer";

/// Token from `Authorization: Bearer <token>`. The scheme is matched in any
/// letter case; a bare token without the scheme is accepted as well.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = match value.get(..BEARER.len()) {
        Some(scheme)
            if scheme.eq_ignore_ascii_case(BEARER)
                && value[BEARER.len()..]
                    .chars()
                    .next()
                    .is_none_or(char::is_whitespace) =>
        {
            &value[BEARER.len()..]
        }
        _ => value,
    }
    .trim();
    (!token.is_empty()).then_some(token)
}

/// Axum middleware: derives the caller identity from the bearer token, if
/// any, and stores it in request extensions as [`AuthContext`].
pub async fn auth_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = bearer_token(request.headers())
        .and_then(|token| verify_access_token(token, state.config.token.secret.as_bytes()));

    if identity.is_none() && request.headers().contains_key(AUTHORIZATION) {
        debug!(path = %request.uri().path(), "ignoring invalid access token");
    }

    request.extensions_mut().insert(AuthContext(identity));
    next.run(request).await
}
