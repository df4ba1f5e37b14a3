//! # clinic_api
//!
//! HTTP API library for the clinic portal: authentication, role-based
//! authorization and the user and dentist endpoints.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policies;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, Method, StatusCode, header};
use axum::routing::{get, post, put};
use clinic_core::auth::memory::{MemoryRefreshTokenStore, MemoryUserDirectory};
use clinic_core::auth::queries::{PgRefreshTokenStore, PgUserDirectory};
use clinic_core::auth::store::RefreshTokenStore;
use clinic_core::auth::users::UserDirectory;
use clinic_core::dentists::{DentistRepository, MemoryDentistRepository, PgDentistRepository};
use clinic_core::rbac::PolicyEnforcer;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, dentists, health, rbac};
use crate::middleware::auth::auth_context;
use crate::middleware::authorize::authorize;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserDirectory>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
    pub dentists: Arc<dyn DentistRepository>,
    /// Compiled policy table, fixed before the server starts.
    pub enforcer: Arc<PolicyEnforcer>,
    pub config: ApiConfig,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool, config: ApiConfig, enforcer: PolicyEnforcer) -> Self {
        Self {
            users: Arc::new(PgUserDirectory::new(pool.clone())),
            refresh_tokens: Arc::new(PgRefreshTokenStore::new(pool.clone())),
            dentists: Arc::new(PgDentistRepository::new(pool)),
            enforcer: Arc::new(enforcer),
            config,
        }
    }

    /// State held entirely in process memory. Nothing survives a restart.
    pub fn in_memory(config: ApiConfig, enforcer: PolicyEnforcer) -> Self {
        Self {
            users: Arc::new(MemoryUserDirectory::new()),
            refresh_tokens: Arc::new(MemoryRefreshTokenStore::new()),
            dentists: Arc::new(MemoryDentistRepository::new()),
            enforcer: Arc::new(enforcer),
            config,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `clinic_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    clinic_core::migrate::migrate(pool).await
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([header::LINK])
        .allow_credentials(true)
        .max_age(Duration::from_secs(300))
}

/// Builds the Axum router with all routes and shared state.
///
/// Gated handlers carry the authorization gate as a method-level route
/// layer, so a method with no handler on a path still answers 405.
pub fn router(state: AppState) -> Router {
    let gate = || axum::middleware::from_fn_with_state(state.clone(), authorize);

    let v1 = Router::new()
        .route(routes::POST_V1_LOGIN, post(auth::login_handler))
        .route(routes::POST_V1_REFRESH, post(auth::refresh_handler))
        .route(routes::POST_V1_LOGOUT, post(auth::logout_handler))
        .route(routes::V1_DENTISTS, get(dentists::list_dentists_handler))
        .route(
            routes::V1_DENTISTS_ID,
            get(dentists::get_dentist_handler)
                .merge(put(dentists::update_dentist_handler).route_layer(gate())),
        )
        .route(
            routes::V1_RBAC_ROLES,
            get(rbac::list_roles_handler).route_layer(gate()),
        )
        .route(
            routes::V1_RBAC_USER,
            get(rbac::current_user_handler)
                .post(rbac::create_user_handler)
                .route_layer(gate()),
        )
        .route(
            routes::V1_RBAC_USERS,
            get(rbac::list_users_handler).route_layer(gate()),
        )
        .route(
            routes::V1_RBAC_USER_ID,
            put(rbac::update_user_handler)
                .delete(rbac::delete_user_handler)
                .route_layer(gate()),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_context,
        ));

    let timeout = state.config.request_timeout;
    Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .merge(v1)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}
