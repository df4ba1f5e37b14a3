//! User and role management handlers.

use axum::Json;
use axum::extract::{Path, State};
use clinic_core::models::auth::Role;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthContext;
use crate::models::{
    Empty, GuidResponse, ListUsersQuery, RolesResponse, UserRequest, UserResponse,
};

/// `GET /v1/rbac/roles`
pub async fn list_roles_handler() -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: Role::ALL.to_vec(),
    })
}

/// `GET /v1/rbac/user`: profile of the calling user.
pub async fn current_user_handler(
    State(state): State<AppState>,
    auth: AuthContext,
) -> AppResult<Json<UserResponse>> {
    let user_id = auth
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("authentication required".into()))?;
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;
    Ok(Json(user.into()))
}

/// `GET /v1/rbac/users?role=<role>`
pub async fn list_users_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListUsersQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.users.list(query.role).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// `POST /v1/rbac/user`
pub async fn create_user_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(body): AppJson<UserRequest>,
) -> AppResult<Json<GuidResponse>> {
    let user = state.users.create(body.into()).await?;
    info!(
        user_id = %user.guid,
        role = %user.role,
        created_by = auth.user_id(),
        "user created"
    );
    Ok(Json(GuidResponse { guid: user.guid }))
}

/// `PUT /v1/rbac/user/{id}`
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UserRequest>,
) -> AppResult<Json<GuidResponse>> {
    let user = state.users.update(&id, body.into()).await?;
    Ok(Json(GuidResponse { guid: user.guid }))
}

/// `DELETE /v1/rbac/user/{id}`
pub async fn delete_user_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> AppResult<Json<Empty>> {
    state.users.delete(&id).await?;
    info!(user_id = %id, deleted_by = auth.user_id(), "user deleted");
    Ok(Json(Empty {}))
}
