use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared by every handler
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Arc<Self> {
        Arc::new(Self { db })
    }
}
