//! Project drafting and planning row management.
//!
//! Feeds the Reconciliation Engine: a project's roster and communication plan
//! are the source rows its payment view is built from.

pub mod error;
pub mod repository;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ProjectError;
pub use repository::ProjectRepository;
pub use service::ProjectService;
pub use types::{Project, ProjectDetail, ProjectFields, ProjectStatus, UpdateProjectInput};
