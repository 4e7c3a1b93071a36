use crate::common::state::AppState;
use crate::config::Config;
use crate::{common, microplates};
use axum::Router;
use axum::http::HeaderValue;
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

pub fn build_router(db: &DatabaseConnection, config: &Config) -> Router {
    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Confluency API",
            description = "Microplates and per-well cell confluency measurements"
        ),
        tags(
            (name = "health", description = "Service status"),
            (name = "microplates", description = "Microplate registry"),
            (name = "measurements", description = "Confluency readings per well")
        )
    )]
    struct ApiDoc;

    let app_state: AppState = AppState::new(db.clone());

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(common::views::router())
        .nest("/api/microplates", microplates::views::router(&app_state))
        .split_for_parts();

    router
        .merge(Scalar::with_url("/api/docs", api))
        .fallback(common::views::fallback)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// The browser front end is served from another origin
fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() {
        if !config.tests_running {
            tracing::warn!("CORS_ORIGINS not set, accepting requests from any origin");
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
