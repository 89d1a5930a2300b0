//! Project persistence contract.

use palco_shared::types::ProjectId;

use super::types::{Project, ProjectStatus};
use crate::error::RepositoryError;

/// Repository trait for project persistence.
///
/// Implemented by the db crate (PostgreSQL) and by [`crate::memory::MemoryRepository`].
pub trait ProjectRepository: Send + Sync {
    /// Insert a new project.
    fn create_project(
        &self,
        project: Project,
    ) -> impl std::future::Future<Output = Result<Project, RepositoryError>> + Send;

    /// Find a project by ID.
    fn find_project(
        &self,
        id: ProjectId,
    ) -> impl std::future::Future<Output = Result<Option<Project>, RepositoryError>> + Send;

    /// List projects newest first, optionally filtered by status.
    fn list_projects(
        &self,
        status: Option<ProjectStatus>,
    ) -> impl std::future::Future<Output = Result<Vec<Project>, RepositoryError>> + Send;

    /// Replace the descriptive fields and status of a project.
    ///
    /// Returns `false` if the project does not exist.
    fn update_project(
        &self,
        project: Project,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete a project and every dependent row.
    ///
    /// Returns `false` if the project did not exist.
    fn delete_project(
        &self,
        id: ProjectId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
