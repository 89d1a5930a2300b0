//! Project and planning management.

use std::sync::Arc;

use chrono::Utc;

use palco_shared::types::{CommunicationItemId, ProjectId, TeamMemberId};

use super::error::ProjectError;
use super::types::{Project, ProjectDetail, ProjectFields, ProjectStatus, UpdateProjectInput};
use crate::planning::{CommunicationItem, NewCommunicationItem, NewTeamMember, TeamMember};
use crate::reconciliation::ReconciliationStore;
use crate::storage::StorageService;

/// Longest accepted short text field, in characters.
pub const MAX_TEXT_LEN: usize = 255;

/// Longest accepted tax ID (CPF/CNPJ, with punctuation).
pub const MAX_TAX_ID_LEN: usize = 32;

/// Service for drafting projects and editing their planning rows.
pub struct ProjectService<R: ReconciliationStore> {
    repo: Arc<R>,
    storage: Arc<StorageService>,
}

impl<R: ReconciliationStore> ProjectService<R> {
    /// Create a new project service.
    #[must_use]
    pub fn new(repo: Arc<R>, storage: Arc<StorageService>) -> Self {
        Self { repo, storage }
    }

    /// Create a draft project.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if required fields are blank or the execution
    /// period is inverted.
    pub async fn create_project(&self, fields: ProjectFields) -> Result<Project, ProjectError> {
        let fields = validate_fields(fields)?;

        let project = Project {
            id: ProjectId::new(),
            fields,
            status: ProjectStatus::Draft,
            created_at: Utc::now(),
        };

        let project = self.repo.create_project(project).await?;
        tracing::info!(project_id = %project.id, "project created");
        Ok(project)
    }

    /// Get a project with its roster and communication plan.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the project does not exist.
    pub async fn get_project(&self, id: ProjectId) -> Result<ProjectDetail, ProjectError> {
        let project = self
            .repo
            .find_project(id)
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        let team_members = self.repo.list_team_members(id).await?;
        let communication_items = self.repo.list_communication_items(id).await?;

        Ok(ProjectDetail {
            project,
            team_members,
            communication_items,
        })
    }

    /// List all projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ProjectError> {
        Ok(self.repo.list_projects(None).await?)
    }

    /// Replace a project's descriptive fields and, optionally, its status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the project does not exist, `Validation` for bad input.
    pub async fn update_project(
        &self,
        id: ProjectId,
        input: UpdateProjectInput,
    ) -> Result<Project, ProjectError> {
        let fields = validate_fields(input.fields)?;

        let current = self
            .repo
            .find_project(id)
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        let project = Project {
            fields,
            status: input.status.unwrap_or(current.status),
            ..current
        };

        if !self.repo.update_project(project.clone()).await? {
            return Err(ProjectError::NotFound(id));
        }

        tracing::info!(
            project_id = %id,
            status = project.status.as_str(),
            "project updated"
        );
        Ok(project)
    }

    /// Delete a project with every planning row, payment record and attachment.
    ///
    /// Stored files are removed first, best-effort. Returns `false` if the
    /// project did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn delete_project(&self, id: ProjectId) -> Result<bool, ProjectError> {
        if self.repo.find_project(id).await?.is_none() {
            tracing::debug!(project_id = %id, "project already absent");
            return Ok(false);
        }

        let record_ids: Vec<_> = self
            .repo
            .list_payment_records(id)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        if !record_ids.is_empty() {
            for attachment in self.repo.list_attachments(&record_ids).await? {
                if let Err(e) = self.storage.delete(&attachment.storage_key).await {
                    tracing::warn!(
                        storage_key = %attachment.storage_key,
                        error = %e,
                        "failed to delete stored file"
                    );
                }
            }
        }

        let removed = self.repo.delete_project(id).await?;
        tracing::info!(project_id = %id, records = record_ids.len(), "project deleted");
        Ok(removed)
    }

    /// Append a row to the technical staff roster.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown project and `Validation` if name or
    /// role is blank.
    pub async fn add_team_member(
        &self,
        project_id: ProjectId,
        input: NewTeamMember,
    ) -> Result<TeamMember, ProjectError> {
        let name = required(&input.name, "name")?;
        let role = required(&input.role, "role")?;
        let tax_id = optional(input.tax_id, "tax_id", MAX_TAX_ID_LEN)?;
        self.ensure_project(project_id).await?;

        let member = TeamMember {
            id: TeamMemberId::new(),
            project_id,
            name,
            role,
            tax_id,
            created_at: Utc::now(),
        };

        let member = self.repo.insert_team_member(member).await?;
        tracing::info!(project_id = %project_id, member_id = %member.id, "team member added");
        Ok(member)
    }

    /// Append a row to the communication plan.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown project and `Validation` if the
    /// item description is blank.
    pub async fn add_communication_item(
        &self,
        project_id: ProjectId,
        input: NewCommunicationItem,
    ) -> Result<CommunicationItem, ProjectError> {
        let item_service = required(&input.item_service, "item_service")?;
        let format = optional(input.format, "format", MAX_TEXT_LEN)?;
        let quantity_period = optional(input.quantity_period, "quantity_period", MAX_TEXT_LEN)?;
        let channel = optional(input.channel, "channel", MAX_TEXT_LEN)?;
        self.ensure_project(project_id).await?;

        let item = CommunicationItem {
            id: CommunicationItemId::new(),
            project_id,
            item_service,
            format,
            quantity_period,
            channel,
            created_at: Utc::now(),
        };

        let item = self.repo.insert_communication_item(item).await?;
        tracing::info!(project_id = %project_id, item_id = %item.id, "communication item added");
        Ok(item)
    }

    /// Remove a roster row. Returns `false` if it did not exist.
    ///
    /// Payment records already keyed to the row are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn delete_team_member(&self, id: TeamMemberId) -> Result<bool, ProjectError> {
        let removed = self.repo.delete_team_member(id).await?;
        tracing::info!(member_id = %id, removed, "team member deleted");
        Ok(removed)
    }

    /// Remove a communication plan row. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn delete_communication_item(
        &self,
        id: CommunicationItemId,
    ) -> Result<bool, ProjectError> {
        let removed = self.repo.delete_communication_item(id).await?;
        tracing::info!(item_id = %id, removed, "communication item deleted");
        Ok(removed)
    }

    async fn ensure_project(&self, id: ProjectId) -> Result<(), ProjectError> {
        match self.repo.find_project(id).await? {
            Some(_) => Ok(()),
            None => Err(ProjectError::NotFound(id)),
        }
    }
}

fn validate_fields(mut fields: ProjectFields) -> Result<ProjectFields, ProjectError> {
    fields.name = required(&fields.name, "name")?;
    fields.prepared_by = required(&fields.prepared_by, "prepared_by")?;

    if let (Some(start), Some(end)) = (fields.execution_start, fields.execution_end)
        && start > end
    {
        return Err(ProjectError::validation(
            "execution_start must not be after execution_end",
        ));
    }

    Ok(fields)
}

fn required(value: &str, field: &str) -> Result<String, ProjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProjectError::validation(format!("{field} is required")));
    }
    bounded(trimmed, field, MAX_TEXT_LEN)?;
    Ok(trimmed.to_string())
}

fn optional(
    value: Option<String>,
    field: &str,
    max: usize,
) -> Result<Option<String>, ProjectError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    if let Some(v) = &value {
        bounded(v, field, max)?;
    }
    Ok(value)
}

fn bounded(value: &str, field: &str, max: usize) -> Result<(), ProjectError> {
    if value.chars().count() > max {
        return Err(ProjectError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
