//! Planning Store contract.

use palco_shared::types::{CommunicationItemId, ProjectId, TeamMemberId};

use super::types::{CommunicationItem, TeamMember};
use crate::error::RepositoryError;

/// Persistence for the two planning lists of a project.
///
/// Both list operations return rows in insertion order. The reconciliation
/// engine only reads through this trait; the insert/delete operations belong
/// to the project editing flow.
pub trait PlanningStore: Send + Sync {
    /// List roster rows of a project.
    fn list_team_members(
        &self,
        project_id: ProjectId,
    ) -> impl std::future::Future<Output = Result<Vec<TeamMember>, RepositoryError>> + Send;

    /// List communication plan rows of a project.
    fn list_communication_items(
        &self,
        project_id: ProjectId,
    ) -> impl std::future::Future<Output = Result<Vec<CommunicationItem>, RepositoryError>> + Send;

    /// Find a roster row by ID.
    fn find_team_member(
        &self,
        id: TeamMemberId,
    ) -> impl std::future::Future<Output = Result<Option<TeamMember>, RepositoryError>> + Send;

    /// Find a communication plan row by ID.
    fn find_communication_item(
        &self,
        id: CommunicationItemId,
    ) -> impl std::future::Future<Output = Result<Option<CommunicationItem>, RepositoryError>> + Send;

    /// Insert a roster row.
    fn insert_team_member(
        &self,
        member: TeamMember,
    ) -> impl std::future::Future<Output = Result<TeamMember, RepositoryError>> + Send;

    /// Insert a communication plan row.
    fn insert_communication_item(
        &self,
        item: CommunicationItem,
    ) -> impl std::future::Future<Output = Result<CommunicationItem, RepositoryError>> + Send;

    /// Delete a roster row. Returns whether a row was removed.
    fn delete_team_member(
        &self,
        id: TeamMemberId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete a communication plan row. Returns whether a row was removed.
    fn delete_communication_item(
        &self,
        id: CommunicationItemId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
