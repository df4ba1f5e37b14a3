//! Authentication logic.
//!
//! Provides password hashing, JWT issuing and parsing, the refresh token
//! store and the user directory shared by `clinic_api` and the server binary.

pub mod jwt;
pub mod memory;
pub mod password;
pub mod queries;
pub mod store;
pub mod users;

use thiserror::Error;

pub use jwt::TokenError;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
