//! PostgreSQL-backed user directory and refresh token store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use super::store::{RefreshTokenStore, conflict, not_found};
use super::users::{UserDirectory, new_user, updated_user};
use crate::models::auth::{RefreshTokenRecord, Role, User, UserInput};

/// Column list shared by the user queries; order matches [`UserRow`].
const USER_COLUMNS: &str = "guid::text, role::text, firstname, lastname, username, password, \
                            created_at, updated_at";

type UserRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn user_from_row(row: UserRow) -> Result<User, AuthError> {
    let (guid, role, firstname, lastname, username, password_hash, created_at, updated_at) = row;
    let role: Role = role
        .parse()
        .map_err(|e| AuthError::Internal(format!("users.role: {e}")))?;
    Ok(User {
        guid,
        role,
        firstname,
        lastname,
        username,
        password_hash,
        created_at,
        updated_at,
    })
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Users in the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(user_from_row).transpose()
    }

    async fn find_by_id(&self, guid: &str) -> Result<Option<User>, AuthError> {
        let Ok(guid) = Uuid::parse_str(guid) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE guid = $1"
        ))
        .bind(guid)
        .fetch_optional(&self.pool)
        .await?;
        row.map(user_from_row).transpose()
    }

    async fn create(&self, input: UserInput) -> Result<User, AuthError> {
        let user = new_user(input)?;
        sqlx::query(
            "INSERT INTO users (guid, role, firstname, lastname, username, password, created_at, updated_at) \
             VALUES ($1::uuid, $2::user_role, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&user.guid)
        .bind(user.role.as_str())
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::Conflict(format!("username '{}' already exists", user.username))
            } else {
                AuthError::from(e)
            }
        })?;
        Ok(user)
    }

    async fn update(&self, guid: &str, input: UserInput) -> Result<User, AuthError> {
        let existing = self
            .find_by_id(guid)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("user {guid}")))?;
        let user = updated_user(&existing, input)?;

        let result = sqlx::query(
            "UPDATE users SET role = $2::user_role, firstname = $3, lastname = $4, \
             username = $5, password = $6, updated_at = $7 \
             WHERE guid = $1::uuid",
        )
        .bind(&user.guid)
        .bind(user.role.as_str())
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::Conflict(format!("username '{}' already exists", user.username))
            } else {
                AuthError::from(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(format!("user {guid}")));
        }
        Ok(user)
    }

    async fn delete(&self, guid: &str) -> Result<(), AuthError> {
        let not_found = || AuthError::NotFound(format!("user {guid}"));
        let id = Uuid::parse_str(guid).map_err(|_| not_found())?;
        let result = sqlx::query("DELETE FROM users WHERE guid = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AuthError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE $1::text IS NULL OR role::text = $1 \
             ORDER BY created_at, guid"
        ))
        .bind(role.map(|r| r.as_str()))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(user_from_row).collect()
    }
}

/// Refresh tokens in the `refresh_tokens` table, keyed by token value.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn put(&self, token: &str, user_id: &str) -> Result<(), AuthError> {
        sqlx::query("INSERT INTO refresh_tokens (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    conflict()
                } else {
                    AuthError::from(e)
                }
            })?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<RefreshTokenRecord, AuthError> {
        let row = sqlx::query_as::<_, (String, String, DateTime<Utc>)>(
            "SELECT token, user_id, created_at FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(record_from_row).ok_or_else(not_found)
    }

    async fn delete(&self, token: &str) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn take(&self, token: &str) -> Result<RefreshTokenRecord, AuthError> {
        // Single statement: concurrent takers serialize on the row lock and
        // only the first one gets it back.
        let row = sqlx::query_as::<_, (String, String, DateTime<Utc>)>(
            "DELETE FROM refresh_tokens WHERE token = $1 \
             RETURNING token, user_id, created_at",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(record_from_row).ok_or_else(not_found)
    }
}

fn record_from_row((token, user_id, created_at): (String, String, DateTime<Utc>)) -> RefreshTokenRecord {
    RefreshTokenRecord {
        token,
        user_id,
        created_at,
    }
}
