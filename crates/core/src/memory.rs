//! In-memory repository backend.
//!
//! Used when `database.backend = "memory"` and by the service tests. All
//! uniqueness checks happen under a single write lock, so the natural key and
//! attachment slot constraints hold without a database.

use tokio::sync::RwLock;

use palco_shared::types::{
    AttachmentId, CommunicationItemId, PaymentRecordId, ProjectId, TeamMemberId,
};

use crate::error::RepositoryError;
use crate::planning::{CommunicationItem, PlanningStore, TeamMember};
use crate::project::{Project, ProjectRepository, ProjectStatus};
use crate::reconciliation::{
    Attachment, AttachmentKind, NaturalKey, PaymentRecord, PaymentRepository,
};

#[derive(Debug, Default)]
struct MemoryState {
    projects: Vec<Project>,
    team_members: Vec<TeamMember>,
    communication_items: Vec<CommunicationItem>,
    payment_records: Vec<PaymentRecord>,
    attachments: Vec<Attachment>,
}

impl MemoryState {
    fn remove_records(&mut self, keep: impl Fn(&PaymentRecord) -> bool) {
        let removed: Vec<PaymentRecordId> = self
            .payment_records
            .iter()
            .filter(|r| !keep(*r))
            .map(|r| r.id)
            .collect();
        self.payment_records.retain(|r| keep(r));
        self.attachments
            .retain(|a| !removed.contains(&a.payment_record_id));
    }
}

/// Repository keeping every row in process memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectRepository for MemoryRepository {
    async fn create_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut state = self.state.write().await;
        if state.projects.iter().any(|p| p.id == project.id) {
            return Err(RepositoryError::conflict(format!("project {}", project.id)));
        }
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, RepositoryError> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state
            .projects
            .iter()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(projects)
    }

    async fn update_project(&self, project: Project) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let Some(stored) = state.projects.iter_mut().find(|p| p.id == project.id) else {
            return Ok(false);
        };
        stored.fields = project.fields;
        stored.status = project.status;
        Ok(true)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let before = state.projects.len();
        state.projects.retain(|p| p.id != id);
        if state.projects.len() == before {
            return Ok(false);
        }
        state.team_members.retain(|m| m.project_id != id);
        state.communication_items.retain(|i| i.project_id != id);
        state.remove_records(|r| r.project_id != id);
        Ok(true)
    }
}

impl PlanningStore for MemoryRepository {
    async fn list_team_members(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<TeamMember>, RepositoryError> {
        let state = self.state.read().await;
        let mut members: Vec<TeamMember> = state
            .team_members
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(members)
    }

    async fn list_communication_items(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<CommunicationItem>, RepositoryError> {
        let state = self.state.read().await;
        let mut items: Vec<CommunicationItem> = state
            .communication_items
            .iter()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn find_team_member(
        &self,
        id: TeamMemberId,
    ) -> Result<Option<TeamMember>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.team_members.iter().find(|m| m.id == id).cloned())
    }

    async fn find_communication_item(
        &self,
        id: CommunicationItemId,
    ) -> Result<Option<CommunicationItem>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.communication_items.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_team_member(&self, member: TeamMember) -> Result<TeamMember, RepositoryError> {
        let mut state = self.state.write().await;
        if !state.projects.iter().any(|p| p.id == member.project_id) {
            return Err(RepositoryError::backend(format!(
                "project {} does not exist",
                member.project_id
            )));
        }
        state.team_members.push(member.clone());
        Ok(member)
    }

    async fn insert_communication_item(
        &self,
        item: CommunicationItem,
    ) -> Result<CommunicationItem, RepositoryError> {
        let mut state = self.state.write().await;
        if !state.projects.iter().any(|p| p.id == item.project_id) {
            return Err(RepositoryError::backend(format!(
                "project {} does not exist",
                item.project_id
            )));
        }
        state.communication_items.push(item.clone());
        Ok(item)
    }

    async fn delete_team_member(&self, id: TeamMemberId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let before = state.team_members.len();
        state.team_members.retain(|m| m.id != id);
        Ok(state.team_members.len() != before)
    }

    async fn delete_communication_item(
        &self,
        id: CommunicationItemId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let before = state.communication_items.len();
        state.communication_items.retain(|i| i.id != id);
        Ok(state.communication_items.len() != before)
    }
}

impl PaymentRepository for MemoryRepository {
    async fn list_payment_records(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<PaymentRecord>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .payment_records
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn find_payment_record(
        &self,
        id: PaymentRecordId,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.payment_records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_natural_key(
        &self,
        key: &NaturalKey,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .payment_records
            .iter()
            .find(|r| r.natural_key() == *key)
            .cloned())
    }

    async fn insert_payment_record(
        &self,
        record: PaymentRecord,
    ) -> Result<PaymentRecord, RepositoryError> {
        let mut state = self.state.write().await;
        let key = record.natural_key();
        if state.payment_records.iter().any(|r| r.natural_key() == key) {
            return Err(RepositoryError::conflict(format!(
                "payment record for {} {} in project {}",
                key.origin, key.source_item_id, key.project_id
            )));
        }
        state.payment_records.push(record.clone());
        Ok(record)
    }

    async fn update_payment_record(&self, record: PaymentRecord) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let Some(stored) = state.payment_records.iter_mut().find(|r| r.id == record.id) else {
            return Ok(false);
        };
        stored.description = record.description;
        stored.amount = record.amount;
        stored.paid = record.paid;
        stored.payment_date = record.payment_date;
        stored.notes = record.notes;
        stored.updated_at = record.updated_at;
        Ok(true)
    }

    async fn delete_payment_record(&self, id: PaymentRecordId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let before = state.payment_records.len();
        state.remove_records(|r| r.id != id);
        Ok(state.payment_records.len() != before)
    }

    async fn list_attachments(
        &self,
        record_ids: &[PaymentRecordId],
    ) -> Result<Vec<Attachment>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .attachments
            .iter()
            .filter(|a| record_ids.contains(&a.payment_record_id))
            .cloned()
            .collect())
    }

    async fn find_attachment(
        &self,
        id: AttachmentId,
    ) -> Result<Option<Attachment>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.attachments.iter().find(|a| a.id == id).cloned())
    }

    async fn find_attachment_by_slot(
        &self,
        record_id: PaymentRecordId,
        kind: AttachmentKind,
    ) -> Result<Option<Attachment>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .attachments
            .iter()
            .find(|a| a.payment_record_id == record_id && a.kind == kind)
            .cloned())
    }

    async fn replace_attachment(
        &self,
        attachment: Attachment,
    ) -> Result<Option<Attachment>, RepositoryError> {
        let mut state = self.state.write().await;
        if !state
            .payment_records
            .iter()
            .any(|r| r.id == attachment.payment_record_id)
        {
            return Err(RepositoryError::backend(format!(
                "payment record {} does not exist",
                attachment.payment_record_id
            )));
        }
        if state.attachments.iter().any(|a| a.id == attachment.id) {
            return Err(RepositoryError::conflict(format!(
                "attachment {} already exists",
                attachment.id
            )));
        }

        let previous = state
            .attachments
            .iter()
            .position(|a| {
                a.payment_record_id == attachment.payment_record_id && a.kind == attachment.kind
            })
            .map(|index| state.attachments.remove(index));
        state.attachments.push(attachment);
        Ok(previous)
    }

    async fn delete_attachment(&self, id: AttachmentId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let before = state.attachments.len();
        state.attachments.retain(|a| a.id != id);
        Ok(state.attachments.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::project::ProjectFields;
    use crate::reconciliation::Origin;

    fn project(created_at: chrono::DateTime<Utc>, status: ProjectStatus) -> Project {
        Project {
            id: ProjectId::new(),
            fields: ProjectFields {
                name: "Festival".to_string(),
                prepared_by: "Ana".to_string(),
                ..ProjectFields::default()
            },
            status,
            created_at,
        }
    }

    fn record(project_id: ProjectId, source_item_id: Uuid) -> PaymentRecord {
        let now = Utc::now();
        PaymentRecord {
            id: PaymentRecordId::new(),
            project_id,
            origin: Origin::Roster,
            source_item_id,
            description: "d".to_string(),
            amount: dec!(10),
            paid: false,
            payment_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn attachment(record_id: PaymentRecordId, kind: AttachmentKind) -> Attachment {
        Attachment {
            id: AttachmentId::new(),
            payment_record_id: record_id,
            kind,
            file_name: "a.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            storage_key: "k".to_string(),
            size: 1,
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_projects_newest_first_with_filter() {
        let repo = MemoryRepository::new();
        let now = Utc::now();
        let old = project(now - Duration::days(2), ProjectStatus::Finalized);
        let mid = project(now - Duration::days(1), ProjectStatus::Draft);
        let new = project(now, ProjectStatus::Finalized);
        for p in [&mid, &old, &new] {
            repo.create_project(p.clone()).await.unwrap();
        }

        let all: Vec<_> = repo
            .list_projects(None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(all, vec![new.id, mid.id, old.id]);

        let finalized: Vec<_> = repo
            .list_projects(Some(ProjectStatus::Finalized))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(finalized, vec![new.id, old.id]);
    }

    #[tokio::test]
    async fn test_natural_key_conflict() {
        let repo = MemoryRepository::new();
        let p = project(Utc::now(), ProjectStatus::Finalized);
        repo.create_project(p.clone()).await.unwrap();
        let source = Uuid::now_v7();

        repo.insert_payment_record(record(p.id, source)).await.unwrap();
        let err = repo
            .insert_payment_record(record(p.id, source))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_replace_attachment_swaps_slot_occupant() {
        let repo = MemoryRepository::new();
        let p = project(Utc::now(), ProjectStatus::Finalized);
        repo.create_project(p.clone()).await.unwrap();
        let r = repo
            .insert_payment_record(record(p.id, Uuid::now_v7()))
            .await
            .unwrap();

        let receipt = attachment(r.id, AttachmentKind::Receipt);
        assert!(repo.replace_attachment(receipt.clone()).await.unwrap().is_none());
        assert!(
            repo.replace_attachment(attachment(r.id, AttachmentKind::Invoice))
                .await
                .unwrap()
                .is_none()
        );

        let newer = attachment(r.id, AttachmentKind::Receipt);
        let displaced = repo.replace_attachment(newer.clone()).await.unwrap();
        assert_eq!(displaced, Some(receipt.clone()));
        assert_eq!(repo.list_attachments(&[r.id]).await.unwrap().len(), 2);
        assert!(repo.find_attachment(receipt.id).await.unwrap().is_none());
        assert_eq!(
            repo.find_attachment_by_slot(r.id, AttachmentKind::Receipt)
                .await
                .unwrap(),
            Some(newer)
        );
    }

    #[tokio::test]
    async fn test_replace_attachment_requires_record() {
        let repo = MemoryRepository::new();
        let err = repo
            .replace_attachment(attachment(PaymentRecordId::new(), AttachmentKind::Receipt))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Backend(_)));
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let repo = MemoryRepository::new();
        let p = project(Utc::now(), ProjectStatus::Finalized);
        repo.create_project(p.clone()).await.unwrap();
        let member = TeamMember {
            id: TeamMemberId::new(),
            project_id: p.id,
            name: "Ana".to_string(),
            role: "Director".to_string(),
            tax_id: None,
            created_at: Utc::now(),
        };
        repo.insert_team_member(member.clone()).await.unwrap();
        let r = repo
            .insert_payment_record(record(p.id, member.id.into_inner()))
            .await
            .unwrap();
        let a = attachment(r.id, AttachmentKind::Receipt);
        repo.replace_attachment(a.clone()).await.unwrap();

        assert!(repo.delete_project(p.id).await.unwrap());

        assert!(repo.find_project(p.id).await.unwrap().is_none());
        assert!(repo.list_team_members(p.id).await.unwrap().is_empty());
        assert!(repo.find_payment_record(r.id).await.unwrap().is_none());
        assert!(repo.find_attachment(a.id).await.unwrap().is_none());
        assert!(!repo.delete_project(p.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_team_member_requires_project() {
        let repo = MemoryRepository::new();
        let member = TeamMember {
            id: TeamMemberId::new(),
            project_id: ProjectId::new(),
            name: "Ana".to_string(),
            role: "Director".to_string(),
            tax_id: None,
            created_at: Utc::now(),
        };
        assert!(repo.insert_team_member(member).await.is_err());
    }
}
