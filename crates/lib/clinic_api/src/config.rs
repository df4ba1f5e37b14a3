//! API server configuration.

use std::path::PathBuf;
use std::time::Duration;

use clinic_core::auth::jwt::resolve_jwt_secret;
use thiserror::Error;

/// Default access token lifetime.
pub const DEFAULT_ACCESS_TTL: &str = "15m";

/// Default refresh token lifetime.
pub const DEFAULT_REFRESH_TTL: &str = "720h";

/// Default per-request timeout.
pub const DEFAULT_CONTEXT_TIMEOUT: &str = "30s";

/// Configuration errors, raised once at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: invalid duration '{value}': {source}")]
    InvalidDuration {
        name: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
}

/// Token signing settings.
#[derive(Clone, Debug)]
pub struct TokenConfig {
    /// HS256 signing secret shared by access and refresh tokens.
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// Casbin-style policy file, merged with the built-in rules at startup.
    pub policy_file: PathBuf,
    /// Upper bound on a single request's processing time.
    pub request_timeout: Duration,
    pub token: TokenConfig,
}

/// Parse a duration string such as `15m`, `720h` or `1h 30m`.
pub fn parse_duration(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration {
        name,
        value: value.to_string(),
        source,
    })
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl TokenConfig {
    /// Signing secret plus `ACCESS_TTL` / `REFRESH_TTL` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: resolve_jwt_secret(),
            access_ttl: parse_duration("ACCESS_TTL", &env_or("ACCESS_TTL", DEFAULT_ACCESS_TTL))?,
            refresh_ttl: parse_duration(
                "REFRESH_TTL",
                &env_or("REFRESH_TTL", DEFAULT_REFRESH_TTL),
            )?,
        })
    }
}
