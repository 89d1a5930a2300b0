//! Persistence backend selected at startup.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbErr};

use palco_core::RepositoryError;
use palco_core::memory::MemoryRepository;
use palco_core::planning::{CommunicationItem, PlanningStore, TeamMember};
use palco_core::project::{Project, ProjectRepository, ProjectStatus};
use palco_core::reconciliation::{
    Attachment, AttachmentKind, NaturalKey, PaymentRecord, PaymentRepository,
};
use palco_shared::types::{
    AttachmentId, CommunicationItemId, PaymentRecordId, ProjectId, TeamMemberId,
};
use palco_shared::{DatabaseBackend, DatabaseConfig};

use super::PgRepository;

/// One of the interchangeable repository implementations.
#[derive(Debug)]
pub enum Repository {
    /// PostgreSQL via `SeaORM`.
    Postgres(PgRepository),
    /// Process memory; data is lost on restart.
    Memory(MemoryRepository),
}

impl Repository {
    /// Build the backend named in configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the PostgreSQL connection cannot be established.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DbErr> {
        match config.backend {
            DatabaseBackend::Memory => {
                tracing::warn!("using in-memory repository; data will not survive a restart");
                Ok(Self::Memory(MemoryRepository::new()))
            }
            DatabaseBackend::Postgres => {
                let mut options = ConnectOptions::new(config.url.clone());
                options
                    .max_connections(config.max_connections)
                    .min_connections(config.min_connections)
                    .connect_timeout(Duration::from_secs(10))
                    .sqlx_logging(false);

                let db = Database::connect(options).await?;
                tracing::info!(
                    max_connections = config.max_connections,
                    "connected to PostgreSQL"
                );
                Ok(Self::Postgres(PgRepository::new(db)))
            }
        }
    }

    /// Backend name for logs and health output.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer a ping.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(repo) => repo
                .connection()
                .ping()
                .await
                .map_err(|e| RepositoryError::backend(e.to_string())),
            Self::Memory(_) => Ok(()),
        }
    }
}

macro_rules! dispatch {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        match $self {
            Self::Postgres(repo) => repo.$method($($arg),*).await,
            Self::Memory(repo) => repo.$method($($arg),*).await,
        }
    };
}

impl ProjectRepository for Repository {
    async fn create_project(&self, project: Project) -> Result<Project, RepositoryError> {
        dispatch!(self.create_project(project))
    }

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        dispatch!(self.find_project(id))
    }

    async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, RepositoryError> {
        dispatch!(self.list_projects(status))
    }

    async fn update_project(&self, project: Project) -> Result<bool, RepositoryError> {
        dispatch!(self.update_project(project))
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        dispatch!(self.delete_project(id))
    }
}

impl PlanningStore for Repository {
    async fn list_team_members(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<TeamMember>, RepositoryError> {
        dispatch!(self.list_team_members(project_id))
    }

    async fn list_communication_items(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<CommunicationItem>, RepositoryError> {
        dispatch!(self.list_communication_items(project_id))
    }

    async fn find_team_member(
        &self,
        id: TeamMemberId,
    ) -> Result<Option<TeamMember>, RepositoryError> {
        dispatch!(self.find_team_member(id))
    }

    async fn find_communication_item(
        &self,
        id: CommunicationItemId,
    ) -> Result<Option<CommunicationItem>, RepositoryError> {
        dispatch!(self.find_communication_item(id))
    }

    async fn insert_team_member(&self, member: TeamMember) -> Result<TeamMember, RepositoryError> {
        dispatch!(self.insert_team_member(member))
    }

    async fn insert_communication_item(
        &self,
        item: CommunicationItem,
    ) -> Result<CommunicationItem, RepositoryError> {
        dispatch!(self.insert_communication_item(item))
    }

    async fn delete_team_member(&self, id: TeamMemberId) -> Result<bool, RepositoryError> {
        dispatch!(self.delete_team_member(id))
    }

    async fn delete_communication_item(
        &self,
        id: CommunicationItemId,
    ) -> Result<bool, RepositoryError> {
        dispatch!(self.delete_communication_item(id))
    }
}

impl PaymentRepository for Repository {
    async fn list_payment_records(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<PaymentRecord>, RepositoryError> {
        dispatch!(self.list_payment_records(project_id))
    }

    async fn find_payment_record(
        &self,
        id: PaymentRecordId,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        dispatch!(self.find_payment_record(id))
    }

    async fn find_by_natural_key(
        &self,
        key: &NaturalKey,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        dispatch!(self.find_by_natural_key(key))
    }

    async fn insert_payment_record(
        &self,
        record: PaymentRecord,
    ) -> Result<PaymentRecord, RepositoryError> {
        dispatch!(self.insert_payment_record(record))
    }

    async fn update_payment_record(&self, record: PaymentRecord) -> Result<bool, RepositoryError> {
        dispatch!(self.update_payment_record(record))
    }

    async fn delete_payment_record(&self, id: PaymentRecordId) -> Result<bool, RepositoryError> {
        dispatch!(self.delete_payment_record(id))
    }

    async fn list_attachments(
        &self,
        record_ids: &[PaymentRecordId],
    ) -> Result<Vec<Attachment>, RepositoryError> {
        dispatch!(self.list_attachments(record_ids))
    }

    async fn find_attachment(
        &self,
        id: AttachmentId,
    ) -> Result<Option<Attachment>, RepositoryError> {
        dispatch!(self.find_attachment(id))
    }

    async fn find_attachment_by_slot(
        &self,
        record_id: PaymentRecordId,
        kind: AttachmentKind,
    ) -> Result<Option<Attachment>, RepositoryError> {
        dispatch!(self.find_attachment_by_slot(record_id, kind))
    }

    async fn replace_attachment(
        &self,
        attachment: Attachment,
    ) -> Result<Option<Attachment>, RepositoryError> {
        dispatch!(self.replace_attachment(attachment))
    }

    async fn delete_attachment(&self, id: AttachmentId) -> Result<bool, RepositoryError> {
        dispatch!(self.delete_attachment(id))
    }
}
