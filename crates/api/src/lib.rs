//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for projects, planning rows and reconciliation
//! - Upload validation for payment attachments
//! - Domain error to HTTP status mapping

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use palco_core::project::ProjectService;
use palco_core::reconciliation::ReconciliationService;
use palco_core::storage::StorageService;
use palco_db::Repository;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository backend selected at startup.
    pub repo: Arc<Repository>,
    /// Storage service for payment attachments.
    pub storage: Arc<StorageService>,
}

impl AppState {
    /// Create application state.
    #[must_use]
    pub fn new(repo: Repository, storage: StorageService) -> Self {
        Self {
            repo: Arc::new(repo),
            storage: Arc::new(storage),
        }
    }

    /// Project and planning management service.
    #[must_use]
    pub fn projects(&self) -> ProjectService<Repository> {
        ProjectService::new(self.repo.clone(), self.storage.clone())
    }

    /// Reconciliation Engine.
    #[must_use]
    pub fn engine(&self) -> ReconciliationService<Repository> {
        ReconciliationService::new(self.repo.clone(), self.storage.clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
