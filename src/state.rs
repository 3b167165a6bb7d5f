//! Shared application state
//!
//! Handed to every axum handler: the connection pool, the configuration and
//! the document store.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::document_storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub documents: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig, documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            documents,
        }
    }
}
