//! Refresh token store.
//!
//! Issued refresh tokens are recorded by value. A refresh token is
//! exchangeable only while its record exists; exchanging it removes the
//! record, so each value is single use.

use async_trait::async_trait;

use super::AuthError;
use crate::models::auth::RefreshTokenRecord;

/// Server-side record of live refresh tokens.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Record a newly issued token. Fails with `Conflict` if the value exists.
    async fn put(&self, token: &str, user_id: &str) -> Result<(), AuthError>;

    /// Look up a token. Fails with `NotFound` if absent.
    async fn get(&self, token: &str) -> Result<RefreshTokenRecord, AuthError>;

    /// Remove a token. Idempotent; returns whether a record was removed.
    async fn delete(&self, token: &str) -> Result<bool, AuthError>;

    /// Remove a token and return its record in one atomic step.
    ///
    /// Of two concurrent calls with the same value at most one succeeds; the
    /// other fails with `NotFound`.
    async fn take(&self, token: &str) -> Result<RefreshTokenRecord, AuthError>;
}

pub(crate) fn not_found() -> AuthError {
    AuthError::NotFound("refresh token".into())
}

pub(crate) fn conflict() -> AuthError {
    AuthError::Conflict("refresh token already exists".into())
}
