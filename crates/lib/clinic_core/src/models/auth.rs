//! Authentication domain models.
//!
//! These are internal domain models, distinct from the HTTP request and
//! response bodies in `clinic_api::models`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Portal role. Closed set: adding a role is a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Dentist,
    Secretary,
    Website,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Dentist, Role::Secretary, Role::Website];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Dentist => "dentist",
            Role::Secretary => "secretary",
            Role::Website => "website",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "dentist" => Ok(Role::Dentist),
            "secretary" => Ok(Role::Secretary),
            "website" => Ok(Role::Website),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Portal user, as owned by the user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub guid: String,
    pub role: Role,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    /// bcrypt hash, never the plain password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Input for creating or updating a user. `password` is plain text and is
/// hashed by the directory before it is stored.
#[derive(Debug, Clone)]
pub struct UserInput {
    pub role: Role,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub password: String,
}

/// Refresh token record stored server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the caller's role.
    pub sub: String,
    /// User guid.
    pub user_id: String,
    /// Token identifier, random per token.
    pub jti: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// Caller identity derived from a valid access token.
///
/// Lives only for one request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: Role,
    pub user_id: String,
}

impl TryFrom<TokenClaims> for Identity {
    type Error = UnknownRole;

    fn try_from(claims: TokenClaims) -> Result<Self, Self::Error> {
        Ok(Identity {
            role: claims.sub.parse()?,
            user_id: claims.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_eq!("root".parse::<Role>(), Err(UnknownRole("root".into())));
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Secretary).unwrap();
        assert_eq!(json, "\"secretary\"");
    }

    #[test]
    fn identity_from_claims_requires_known_role() {
        let claims = TokenClaims {
            sub: "website".into(),
            user_id: "u-1".into(),
            jti: "j".into(),
            iat: 0,
            exp: 0,
        };
        let identity = Identity::try_from(claims.clone()).unwrap();
        assert_eq!(identity.role, Role::Website);
        assert_eq!(identity.user_id, "u-1");

        let bad = TokenClaims {
            sub: "ghost".into(),
            ..claims
        };
        assert!(Identity::try_from(bad).is_err());
    }
}
