use super::models::{Measurement, MeasurementCreate};
use super::services;
use crate::common::errors::BusinessError;
use crate::common::models::ErrorResponse;
use crate::common::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Routes nested under a microplate; the caller supplies the state
pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_latest_measurements))
        .routes(routes!(create_measurement))
        .routes(routes!(get_well_measurements))
}

#[utoipa::path(
    get,
    path = "/{id}/measurements/latest",
    params(
        ("id" = i32, Path, description = "Microplate ID")
    ),
    responses(
        (status = 200, description = "Latest measurement of each measured well, row-major", body = Vec<Measurement>),
        (status = 404, description = "Microplate not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "measurements",
    summary = "Latest measurement per well",
    description = "Walks the plate's wells in row-major order and returns the newest reading of each. Wells without readings are omitted."
)]
pub async fn get_latest_measurements(
    State(app_state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<Measurement>>, BusinessError> {
    let Path(microplate_id) = path?;
    let measurements = services::latest_per_well(&app_state.db, microplate_id).await?;
    Ok(Json(measurements))
}

#[utoipa::path(
    post,
    path = "/{id}/measurements",
    params(
        ("id" = i32, Path, description = "Microplate ID")
    ),
    request_body = MeasurementCreate,
    responses(
        (status = 201, description = "Measurement recorded", body = Measurement),
        (status = 400, description = "Missing or invalid field, or well/percentage out of range", body = ErrorResponse),
        (status = 404, description = "Microplate not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "measurements",
    summary = "Record a measurement"
)]
pub async fn create_measurement(
    State(app_state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MeasurementCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Measurement>), BusinessError> {
    let Path(microplate_id) = path?;
    let Json(data) = payload?;
    let measurement = services::create_measurement(&app_state.db, microplate_id, data).await?;
    Ok((StatusCode::CREATED, Json(measurement)))
}

#[utoipa::path(
    get,
    path = "/{id}/measurements/well/{row}/{column}",
    params(
        ("id" = i32, Path, description = "Microplate ID"),
        ("row" = i64, Path, description = "0-based row index"),
        ("column" = i64, Path, description = "0-based column index")
    ),
    responses(
        (status = 200, description = "All measurements of the well, newest first", body = Vec<Measurement>),
        (status = 400, description = "Well outside the plate", body = ErrorResponse),
        (status = 404, description = "Microplate not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "measurements",
    summary = "Measurement history of one well"
)]
pub async fn get_well_measurements(
    State(app_state): State<AppState>,
    path: Result<Path<(i32, i64, i64)>, PathRejection>,
) -> Result<Json<Vec<Measurement>>, BusinessError> {
    let Path((microplate_id, row, column)) = path?;
    let measurements = services::well_history(&app_state.db, microplate_id, row, column).await?;
    Ok(Json(measurements))
}
