//! User directory.
//!
//! Portal users and their roles. Usernames are unique and serve as the
//! login identifier.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::AuthError;
use super::password::{hash_password, verify_password};
use crate::models::auth::{Role, User, UserInput};

/// Storage for portal users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

    async fn find_by_id(&self, guid: &str) -> Result<Option<User>, AuthError>;

    /// Create a user, hashing the supplied password.
    async fn create(&self, input: UserInput) -> Result<User, AuthError>;

    /// Replace a user's fields, re-hashing the supplied password.
    async fn update(&self, guid: &str, input: UserInput) -> Result<User, AuthError>;

    async fn delete(&self, guid: &str) -> Result<(), AuthError>;

    /// List users, optionally restricted to one role.
    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AuthError>;
}

/// Look up `username` and check `password` against its stored hash.
///
/// An unknown username and a wrong password both yield `CredentialError`.
pub async fn authenticate(
    users: &dyn UserDirectory,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = users
        .find_by_username(username)
        .await?
        .ok_or(AuthError::CredentialError)?;
    if !verify_password(&user.password_hash, password)? {
        return Err(AuthError::CredentialError);
    }
    Ok(user)
}

/// Validate input and build a new user with a fresh UUIDv7 guid.
pub(crate) fn new_user(input: UserInput) -> Result<User, AuthError> {
    validate(&input)?;
    let now = Utc::now();
    Ok(User {
        guid: Uuid::now_v7().to_string(),
        role: input.role,
        password_hash: hash_password(&input.password)?,
        firstname: input.firstname,
        lastname: input.lastname,
        username: input.username,
        created_at: now,
        updated_at: now,
    })
}

/// Apply an update to an existing user.
pub(crate) fn updated_user(existing: &User, input: UserInput) -> Result<User, AuthError> {
    validate(&input)?;
    Ok(User {
        guid: existing.guid.clone(),
        role: input.role,
        password_hash: hash_password(&input.password)?,
        firstname: input.firstname,
        lastname: input.lastname,
        username: input.username,
        created_at: existing.created_at,
        updated_at: Utc::now(),
    })
}

fn validate(input: &UserInput) -> Result<(), AuthError> {
    if input.username.trim().is_empty() {
        return Err(AuthError::ValidationError("username must not be empty".into()));
    }
    if input.password.is_empty() {
        return Err(AuthError::ValidationError("password must not be empty".into()));
    }
    Ok(())
}
