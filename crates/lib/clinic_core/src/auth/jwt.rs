//! JWT token issuing and parsing.
//!
//! Access and refresh tokens share one claim shape (`sub` = role, `user_id`)
//! and differ only in lifetime. Both are HS256-signed with a single shared
//! secret.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::{Identity, TokenClaims};

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issue an access and a refresh token for `role` / `user_id`.
pub fn issue_token_pair(
    role: &str,
    user_id: &str,
    secret: &[u8],
    access_ttl: Duration,
    refresh_ttl: Duration,
) -> Result<TokenPair, AuthError> {
    Ok(TokenPair {
        access_token: issue_token(role, user_id, secret, access_ttl)?,
        refresh_token: issue_token(role, user_id, secret, refresh_ttl)?,
    })
}

/// Issue a single signed token valid for `ttl`.
pub fn issue_token(
    role: &str,
    user_id: &str,
    secret: &[u8],
    ttl: Duration,
) -> Result<String, AuthError> {
    let ttl = chrono::Duration::from_std(ttl)
        .map_err(|e| AuthError::Internal(format!("token ttl out of range: {e}")))?;
    let now = Utc::now();
    let claims = TokenClaims {
        sub: role.to_string(),
        user_id: user_id.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode_claims(&claims, secret)
}

fn encode_claims(claims: &TokenClaims, secret: &[u8]) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
}

/// Verify a token's signature and expiry, returning its claims.
pub fn parse_token(token: &str, secret: &[u8]) -> Result<TokenClaims, TokenError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(e.to_string()),
        })?;

    // The library tolerates `exp == now`; a token is live only while `exp > now`.
    if claims.exp <= Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Verify an access token and derive the caller identity.
///
/// Every failure, including an unknown role in `sub`, collapses to `None`.
pub fn verify_access_token(token: &str, secret: &[u8]) -> Option<Identity> {
    parse_token(token, secret)
        .ok()
        .and_then(|claims| Identity::try_from(claims).ok())
}

/// Resolve the signing secret: env var `JWT_SECRET` → `TOKEN_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    for var in ["JWT_SECRET", "TOKEN_SECRET"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    match persist_secret(&secret_path, &secret) {
        Ok(()) => info!(path = %secret_path.display(), "generated new JWT secret"),
        Err(e) => warn!(
            path = %secret_path.display(),
            error = %e,
            "generated JWT secret could not be persisted; tokens will not survive a restart"
        ),
    }
    secret
}

/// Write `secret` to `path`, creating parent directories as needed.
fn persist_secret(path: &Path, secret: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, secret)
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("abclinic")
        .join("jwt-secret")
}
