use reqwest::Client;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared state handed to every handler.
///
/// Cloned per request by axum; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool for all store access
    pub database: Arc<DatabaseConnection>,
    /// Client used by `/seeddata`
    pub http_client: Client,
    /// Dataset location for `/seeddata`
    pub seed_source_url: Arc<str>,
}

impl AppState {
    /// Creates the state from its parts.
    #[must_use]
    pub fn new(
        database: Arc<DatabaseConnection>,
        http_client: Client,
        seed_source_url: &str,
    ) -> Self {
        Self {
            database,
            http_client,
            seed_source_url: Arc::from(seed_source_url),
        }
    }
}
