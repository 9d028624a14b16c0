//! Record service: validated CRUD over user and employee records stored in SQLite.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod resource;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, StoreError};
pub use migration::{apply_migrations, ensure_table};
pub use resource::{Employees, Resource, Users};
pub use routes::{app, common_routes, resource_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{connect, Store};
