use super::errors::BusinessError;
use super::models::HealthCheck;
use axum::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(health))
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = OK, description = "Service is up", body = HealthCheck)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthCheck> {
    Json(HealthCheck::healthy())
}

/// Catch-all for routes that match nothing
pub async fn fallback() -> BusinessError {
    BusinessError::UnknownRoute
}
