use super::measurements;
use super::models::{Microplate, MicroplateCreate};
use super::services;
use crate::common::errors::BusinessError;
use crate::common::models::ErrorResponse;
use crate::common::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_microplates, create_microplate))
        .merge(measurements::views::router())
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "All microplates in creation order", body = Vec<Microplate>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "microplates",
    summary = "List microplates"
)]
pub async fn list_microplates(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Microplate>>, BusinessError> {
    let plates = services::list_microplates(&app_state.db).await?;
    Ok(Json(plates))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = MicroplateCreate,
    responses(
        (status = 201, description = "Microplate created", body = Microplate),
        (status = 400, description = "Missing name, invalid dimensions or duplicate name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "microplates",
    summary = "Create a microplate",
    description = "Registers a new microplate. `rows` and `columns` default to 2 and 3."
)]
pub async fn create_microplate(
    State(app_state): State<AppState>,
    payload: Result<Json<MicroplateCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Microplate>), BusinessError> {
    let Json(data) = payload?;
    let plate = services::create_microplate(&app_state.db, data).await?;
    Ok((StatusCode::CREATED, Json(plate)))
}
