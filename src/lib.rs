//! Catalog service: REST API over a SQLite retail catalog.

pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError};
pub use routes::{app, catalog_routes, common_routes};
pub use service::{CatalogRepository, SqliteCatalog};
pub use settings::Settings;
pub use state::AppState;
pub use store::{connect, ensure_catalog_tables};
