//! Shared application state for all routes.

use crate::service::CatalogRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Opened once at startup and dropped after shutdown; never closed per request.
    pub repo: Arc<dyn CatalogRepository>,
}

impl AppState {
    pub fn new(repo: impl CatalogRepository + 'static) -> Self {
        AppState { repo: Arc::new(repo) }
    }
}
