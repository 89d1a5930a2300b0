//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod projects;
pub mod reconciliation;

/// Creates the API router with all routes.
///
/// The upload body limit is derived from the storage size cap.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(projects::routes())
        .merge(reconciliation::routes(state.storage.config().max_file_size))
}
