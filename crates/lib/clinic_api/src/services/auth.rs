//! Authentication service: login, refresh-token rotation and logout.

use clinic_core::auth::jwt::{TokenPair, issue_token_pair, parse_token};
use clinic_core::auth::store::RefreshTokenStore;
use clinic_core::auth::users::{UserDirectory, authenticate};
use clinic_core::auth::AuthError;
use clinic_core::models::auth::{Role, UserInput};
use tracing::{debug, error, info, warn};

use crate::config::TokenConfig;
use crate::error::{AppError, AppResult};
use crate::models::TokenResponse;

/// Issue a pair for `role` / `user_id` and record the refresh value.
async fn issue_and_store(
    refresh_tokens: &dyn RefreshTokenStore,
    role: &str,
    user_id: &str,
    config: &TokenConfig,
) -> AppResult<TokenPair> {
    let pair = issue_token_pair(
        role,
        user_id,
        config.secret.as_bytes(),
        config.access_ttl,
        config.refresh_ttl,
    )?;
    refresh_tokens
        .put(&pair.refresh_token, user_id)
        .await
        .map_err(|e| {
            error!(user_id, error = %e, "failed to store refresh token");
            AppError::from(e)
        })?;
    Ok(pair)
}

/// Verify credentials and issue a fresh token pair.
pub async fn login(
    users: &dyn UserDirectory,
    refresh_tokens: &dyn RefreshTokenStore,
    username: &str,
    password: &str,
    config: &TokenConfig,
) -> AppResult<TokenResponse> {
    let user = match authenticate(users, username, password).await {
        Ok(user) => user,
        Err(AuthError::CredentialError) => {
            debug!(username, "login rejected");
            return Err(AuthError::CredentialError.into());
        }
        Err(e) => {
            error!(username, error = %e, "login failed");
            return Err(e.into());
        }
    };

    let pair = issue_and_store(refresh_tokens, user.role.as_str(), &user.guid, config).await?;
    info!(user_id = %user.guid, role = %user.role, "user logged in");
    Ok(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    })
}

/// Exchange a refresh token for a new pair.
///
/// The presented value is removed before anything else happens, so it can be
/// exchanged at most once. Any failure after that point leaves the caller
/// without a refresh token; they must log in again.
pub async fn refresh(
    refresh_tokens: &dyn RefreshTokenStore,
    refresh_token: &str,
    config: &TokenConfig,
) -> AppResult<TokenResponse> {
    let record = match refresh_tokens.take(refresh_token).await {
        Ok(record) => record,
        Err(AuthError::NotFound(_)) => {
            return Err(AppError::BadRequest("no such token".into()));
        }
        Err(e) => {
            error!(error = %e, "failed to load refresh token");
            return Err(e.into());
        }
    };

    let claims = parse_token(&record.token, config.secret.as_bytes()).map_err(|e| {
        warn!(user_id = %record.user_id, error = %e, "stored refresh token rejected");
        AppError::BadRequest("invalid token".into())
    })?;

    let pair = issue_and_store(refresh_tokens, &claims.sub, &claims.user_id, config).await?;
    debug!(user_id = %claims.user_id, "refresh token rotated");
    Ok(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    })
}

/// Revoke a refresh token. Unknown values are not an error.
pub async fn logout(refresh_tokens: &dyn RefreshTokenStore, refresh_token: &str) -> AppResult<()> {
    if refresh_tokens.delete(refresh_token).await? {
        debug!("refresh token revoked");
    }
    Ok(())
}

/// Create the initial admin account unless that username already exists.
///
/// Returns `true` when a user was created.
pub async fn ensure_admin(
    users: &dyn UserDirectory,
    username: &str,
    password: &str,
) -> AppResult<bool> {
    if users.find_by_username(username).await?.is_some() {
        return Ok(false);
    }
    let user = users
        .create(UserInput {
            role: Role::Admin,
            firstname: String::new(),
            lastname: String::new(),
            username: username.to_string(),
            password: password.to_string(),
        })
        .await?;
    info!(user_id = %user.guid, username, "admin user created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clinic_core::auth::jwt::issue_token;
    use clinic_core::auth::memory::{MemoryRefreshTokenStore, MemoryUserDirectory};

    use super::*;

    fn config() -> TokenConfig {
        TokenConfig {
            secret: "test-secret".into(),
            access_ttl: Duration::from_secs(900),
            refresh_ttl: Duration::from_secs(3600),
        }
    }

    async fn directory() -> MemoryUserDirectory {
        let users = MemoryUserDirectory::new();
        users
            .create(UserInput {
                role: Role::Dentist,
                firstname: "John".into(),
                lastname: "Smith".into(),
                username: "drsmith".into(),
                password: "tooth-fairy".into(),
            })
            .await
            .unwrap();
        users
    }

    #[tokio::test]
    async fn login_stores_refresh_token() {
        let users = directory().await;
        let store = MemoryRefreshTokenStore::new();

        let resp = login(&users, &store, "drsmith", "tooth-fairy", &config())
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get(&resp.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_bad_request() {
        let users = directory().await;
        let store = MemoryRefreshTokenStore::new();

        let err = login(&users, &store, "drsmith", "nope", &config())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "invalid username or password"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn refresh_rotates_once() {
        let users = directory().await;
        let store = MemoryRefreshTokenStore::new();
        let first = login(&users, &store, "drsmith", "tooth-fairy", &config())
            .await
            .unwrap();

        let second = refresh(&store, &first.refresh_token, &config()).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);
        assert_eq!(store.len(), 1);

        let err = refresh(&store, &first.refresh_token, &config())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "no such token"));
    }

    #[tokio::test]
    async fn refresh_with_unparsable_stored_token_is_terminal() {
        let store = MemoryRefreshTokenStore::new();
        let foreign = issue_token("admin", "u1", b"other-secret", Duration::from_secs(60)).unwrap();
        store.put(&foreign, "u1").await.unwrap();

        let err = refresh(&store, &foreign, &config()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "invalid token"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let store = MemoryRefreshTokenStore::new();
        store.put("abc", "u1").await.unwrap();
        logout(&store, "abc").await.unwrap();
        logout(&store, "abc").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn ensure_admin_creates_once() {
        let users = MemoryUserDirectory::new();
        assert!(ensure_admin(&users, "root", "secret").await.unwrap());
        assert!(!ensure_admin(&users, "root", "other").await.unwrap());
        let admin = users.find_by_username("root").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
