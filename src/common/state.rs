use sea_orm::DatabaseConnection;

/// Shared per-request state; the pooled connection is opened in `main` and closed on shutdown
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}
