//! Dentist profile handlers.

use axum::Json;
use axum::extract::{Path, State};
use clinic_core::models::dentists::DentistUpdate;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthContext;
use crate::models::{DentistResponse, Empty, UpdateDentistRequest};

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("invalid dentist id '{raw}'")))
}

/// `GET /v1/dentists`: all dentists in display order.
pub async fn list_dentists_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DentistResponse>>> {
    let dentists = state.dentists.list().await?;
    Ok(Json(dentists.into_iter().map(DentistResponse::from).collect()))
}

/// `GET /v1/dentists/{id}`
pub async fn get_dentist_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DentistResponse>> {
    let dentist = state.dentists.get(parse_id(&id)?).await?;
    Ok(Json(dentist.into()))
}

/// `PUT /v1/dentists/{id}`: edit a profile's name, info and portrait.
pub async fn update_dentist_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateDentistRequest>,
) -> AppResult<Json<Empty>> {
    let id = parse_id(&id)?;
    state
        .dentists
        .update(
            id,
            DentistUpdate {
                name: body.name,
                info: body.info,
                url: body.img,
            },
        )
        .await?;
    info!(dentist_id = id, user_id = auth.user_id(), "dentist updated");
    Ok(Json(Empty {}))
}
