mod common;
mod config;
mod microplates;
mod routes;

use crate::config::Config;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config: Config = Config::from_env();

    let db: DatabaseConnection = Database::connect(config.db_url.as_str()).await?;
    db.ping().await?;
    tracing::info!("Connected to the database");

    Migrator::up(&db, None).await?;
    tracing::info!("DB migrations complete");

    if let Some(plate) =
        microplates::services::seed_default_microplate(&db, &config.default_microplate_name)
            .await?
    {
        tracing::info!("Sample microplate '{}' created", plate.name);
    }

    tracing::info!(
        "Starting server {} ({} deployment) ...",
        config.app_name,
        config.deployment.to_uppercase()
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");
    tracing::info!("API endpoints available:");
    for endpoint in [
        "GET  /api/health",
        "GET  /api/microplates",
        "POST /api/microplates",
        "GET  /api/microplates/{id}/measurements/latest",
        "POST /api/microplates/{id}/measurements",
        "GET  /api/microplates/{id}/measurements/well/{row}/{column}",
        "GET  /api/docs",
    ] {
        tracing::info!("  {endpoint}");
    }

    let router = routes::build_router(&db, &config);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await?;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        // Without a signal handler, keep serving until the process is killed
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
