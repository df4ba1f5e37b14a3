//! HTTP request and response bodies.

use clinic_core::models::auth::{Role, User, UserInput};
use clinic_core::models::dentists::Dentist;
use serde::{Deserialize, Serialize};

/// Error body returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Empty JSON object (`{}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// RBAC
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolesResponse {
    pub roles: Vec<Role>,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub guid: String,
    pub role: Role,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            guid: u.guid,
            role: u.role,
            firstname: u.firstname,
            lastname: u.lastname,
            username: u.username,
        }
    }
}

/// Body for both creating and updating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    pub role: Role,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    pub username: String,
    pub password: String,
}

impl From<UserRequest> for UserInput {
    fn from(r: UserRequest) -> Self {
        UserInput {
            role: r.role,
            firstname: r.firstname,
            lastname: r.lastname,
            username: r.username,
            password: r.password,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidResponse {
    pub guid: String,
}

// ---------------------------------------------------------------------------
// Dentists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DentistResponse {
    pub id: i64,
    pub clone_name: String,
    pub img: String,
    pub priority: i16,
    pub side: String,
    pub name: String,
    pub info: String,
}

impl From<Dentist> for DentistResponse {
    fn from(d: Dentist) -> Self {
        Self {
            id: d.id,
            clone_name: d.clone_name,
            img: d.url,
            priority: d.priority,
            side: d.side,
            name: d.name,
            info: d.info,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDentistRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub img: String,
}
