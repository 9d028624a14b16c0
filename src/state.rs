//! Shared application state for all routes.

use crate::config::AppConfig;
use crate::resource::Resource;
use crate::service::{CrudService, ValidationPolicy};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        AppState {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            strict_email: self.config.strict_email,
        }
    }

    /// Service for one resource, bound to the shared pool.
    pub fn service<R: Resource>(&self) -> CrudService<R> {
        CrudService::new(self.pool.clone(), self.policy())
    }
}
