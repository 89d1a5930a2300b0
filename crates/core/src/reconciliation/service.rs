//! Reconciliation Engine.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use palco_shared::types::{
    AttachmentId, CommunicationItemId, PaymentRecordId, ProjectId, TeamMemberId,
};

use super::attachment::{Attachment, AttachmentSlots, PutAttachmentInput};
use super::error::ReconciliationError;
use super::repository::ReconciliationStore;
use super::types::{
    Origin, PaymentEntry, PaymentRecord, PaymentView, Totals, UpsertOutcome, UpsertPaymentInput,
};
use super::validation::{validate_amount, validate_file_name};
use crate::error::RepositoryError;
use crate::project::ProjectStatus;
use crate::report::{ConsolidatedReport, ProjectSummary, ReportService};
use crate::storage::{StorageError, StorageService, UploadTarget};

/// Merges planning rows with the payment ledger and manages attachment slots.
///
/// Holds no state of its own; every view is recomputed from the store.
pub struct ReconciliationService<R: ReconciliationStore> {
    repo: Arc<R>,
    storage: Arc<StorageService>,
}

impl<R: ReconciliationStore> ReconciliationService<R> {
    /// Create a new reconciliation service.
    #[must_use]
    pub fn new(repo: Arc<R>, storage: Arc<StorageService>) -> Self {
        Self { repo, storage }
    }

    /// Build the merged payment view of a project.
    ///
    /// Emits one entry per roster row followed by one per plan row, each list
    /// in planning order. Rows without a stored record become placeholders.
    /// Status is not checked here.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist.
    pub async fn build_payment_view(
        &self,
        project_id: ProjectId,
    ) -> Result<PaymentView, ReconciliationError> {
        let project = self
            .repo
            .find_project(project_id)
            .await?
            .ok_or(ReconciliationError::ProjectNotFound(project_id))?;

        let members = self.repo.list_team_members(project_id).await?;
        let items = self.repo.list_communication_items(project_id).await?;
        let records = self.repo.list_payment_records(project_id).await?;

        let record_ids: Vec<PaymentRecordId> = records.iter().map(|r| r.id).collect();
        let attachments = if record_ids.is_empty() {
            Vec::new()
        } else {
            self.repo.list_attachments(&record_ids).await?
        };

        let mut attachments_by_record: HashMap<PaymentRecordId, Vec<Attachment>> = HashMap::new();
        for attachment in attachments {
            attachments_by_record
                .entry(attachment.payment_record_id)
                .or_default()
                .push(attachment);
        }

        let mut ledger: HashMap<(Origin, Uuid), PaymentRecord> = records
            .into_iter()
            .map(|r| ((r.origin, r.source_item_id), r))
            .collect();

        let sources = members
            .iter()
            .map(|m| (Origin::Roster, m.id.into_inner(), m.payment_description()))
            .chain(
                items
                    .iter()
                    .map(|i| (Origin::Plan, i.id.into_inner(), i.payment_description())),
            );

        let mut entries = Vec::with_capacity(members.len() + items.len());
        for (origin, source_item_id, description) in sources {
            let entry = match ledger.remove(&(origin, source_item_id)) {
                Some(record) => {
                    let slots = AttachmentSlots::from_attachments(
                        attachments_by_record.remove(&record.id).unwrap_or_default(),
                    );
                    PaymentEntry::from_record(record, slots)
                }
                None => PaymentEntry::placeholder(origin, source_item_id, description),
            };
            entries.push(entry);
        }

        if !ledger.is_empty() {
            tracing::debug!(
                project_id = %project_id,
                orphaned = ledger.len(),
                "payment records without a planning row left out of view"
            );
        }

        let totals = Totals::from_entries(&entries);

        Ok(PaymentView {
            project,
            entries,
            totals,
        })
    }

    /// Create or update the payment record addressed by the natural key.
    ///
    /// Omitted `amount`/`paid` become zero/false. An omitted description is
    /// derived from the source row on insert and kept on update. An insert
    /// that loses a race on the natural key is retried once as an update.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a negative amount, `ProjectNotFound` or
    /// `SourceItemNotFound` when the key does not resolve.
    pub async fn upsert_payment_record(
        &self,
        input: UpsertPaymentInput,
    ) -> Result<UpsertOutcome, ReconciliationError> {
        let amount = validate_amount(input.amount.unwrap_or(Decimal::ZERO))?;

        self.repo
            .find_project(input.project_id)
            .await?
            .ok_or(ReconciliationError::ProjectNotFound(input.project_id))?;

        let derived_description = self
            .source_description(input.project_id, input.origin, input.source_item_id)
            .await?;

        let key = input.natural_key();
        if let Some(existing) = self.repo.find_by_natural_key(&key).await? {
            return self.apply_update(existing, &input, amount).await;
        }

        let now = Utc::now();
        let record = PaymentRecord {
            id: PaymentRecordId::new(),
            project_id: input.project_id,
            origin: input.origin,
            source_item_id: input.source_item_id,
            description: provided_description(&input).unwrap_or(derived_description),
            amount,
            paid: input.paid.unwrap_or(false),
            payment_date: input.payment_date,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        match self.repo.insert_payment_record(record).await {
            Ok(record) => {
                tracing::info!(
                    record_id = %record.id,
                    project_id = %record.project_id,
                    origin = %record.origin,
                    "payment record created"
                );
                Ok(UpsertOutcome {
                    id: record.id,
                    created: true,
                })
            }
            Err(RepositoryError::Conflict(msg)) => {
                tracing::warn!(
                    project_id = %key.project_id,
                    origin = %key.origin,
                    source_item_id = %key.source_item_id,
                    "insert lost natural key race, retrying as update"
                );
                let existing = self
                    .repo
                    .find_by_natural_key(&key)
                    .await?
                    .ok_or(RepositoryError::Conflict(msg))?;
                self.apply_update(existing, &input, amount).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn apply_update(
        &self,
        existing: PaymentRecord,
        input: &UpsertPaymentInput,
        amount: Decimal,
    ) -> Result<UpsertOutcome, ReconciliationError> {
        let id = existing.id;
        let description = provided_description(input).unwrap_or_else(|| existing.description.clone());
        let record = PaymentRecord {
            description,
            amount,
            paid: input.paid.unwrap_or(false),
            payment_date: input.payment_date,
            notes: input.notes.clone(),
            updated_at: Utc::now(),
            ..existing
        };

        if !self.repo.update_payment_record(record).await? {
            return Err(ReconciliationError::PaymentRecordNotFound(id));
        }

        tracing::info!(record_id = %id, "payment record updated");
        Ok(UpsertOutcome { id, created: false })
    }

    /// Resolve the placeholder description of a source row in a project.
    async fn source_description(
        &self,
        project_id: ProjectId,
        origin: Origin,
        source_item_id: Uuid,
    ) -> Result<String, ReconciliationError> {
        let description = match origin {
            Origin::Roster => self
                .repo
                .find_team_member(TeamMemberId::from(source_item_id))
                .await?
                .filter(|m| m.project_id == project_id)
                .map(|m| m.payment_description()),
            Origin::Plan => self
                .repo
                .find_communication_item(CommunicationItemId::from(source_item_id))
                .await?
                .filter(|i| i.project_id == project_id)
                .map(|i| i.payment_description()),
        };

        description.ok_or_else(|| ReconciliationError::source_item_not_found(origin, source_item_id))
    }

    /// Store a file in an attachment slot, replacing any previous occupant.
    ///
    /// The new file is written first, then the slot row is swapped in one
    /// repository call. The previous file is removed best-effort only after
    /// the swap commits, so a failed upload leaves the old attachment intact.
    /// MIME and size checks belong to the caller.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFileName` for a blank or overlong name,
    /// `PaymentRecordNotFound` if the record does not exist, or a storage
    /// error if the new file cannot be written or its row stored.
    pub async fn put_attachment(
        &self,
        input: PutAttachmentInput,
    ) -> Result<Attachment, ReconciliationError> {
        let file_name = validate_file_name(&input.file_name)?;

        let record = self
            .repo
            .find_payment_record(input.payment_record_id)
            .await?
            .ok_or(ReconciliationError::PaymentRecordNotFound(
                input.payment_record_id,
            ))?;

        let attachment_id = AttachmentId::new();
        let storage_key = StorageService::generate_storage_key(&UploadTarget {
            project_id: record.project_id,
            payment_record_id: record.id,
            slot: input.kind.as_str(),
            attachment_id,
            filename: &file_name,
        });
        let size = i64::try_from(input.bytes.len()).unwrap_or(i64::MAX);

        self.storage.put(&storage_key, input.bytes).await?;

        let attachment = Attachment {
            id: attachment_id,
            payment_record_id: record.id,
            kind: input.kind,
            file_name,
            content_type: input.content_type,
            storage_key: storage_key.clone(),
            size,
            uploaded_at: Utc::now(),
        };

        let previous = match self.repo.replace_attachment(attachment.clone()).await {
            Ok(previous) => previous,
            Err(e) => {
                self.remove_file(&storage_key).await;
                return Err(e.into());
            }
        };

        if let Some(previous) = previous {
            self.remove_file(&previous.storage_key).await;
            tracing::info!(
                attachment_id = %previous.id,
                record_id = %record.id,
                kind = %input.kind,
                "previous attachment replaced"
            );
        }

        tracing::info!(
            attachment_id = %attachment.id,
            record_id = %attachment.payment_record_id,
            kind = %attachment.kind,
            size = attachment.size,
            "attachment stored"
        );
        Ok(attachment)
    }

    /// Fetch attachment metadata together with the stored bytes.
    ///
    /// # Errors
    ///
    /// Returns `AttachmentNotFound` if the row is absent and
    /// `AttachmentFileMissing` if the stored file is gone.
    pub async fn get_attachment(
        &self,
        attachment_id: AttachmentId,
    ) -> Result<(Attachment, Bytes), ReconciliationError> {
        let attachment = self
            .repo
            .find_attachment(attachment_id)
            .await?
            .ok_or(ReconciliationError::AttachmentNotFound(attachment_id))?;

        let bytes = match self.storage.read(&attachment.storage_key).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound { .. }) => {
                return Err(ReconciliationError::AttachmentFileMissing(attachment_id));
            }
            Err(e) => return Err(e.into()),
        };

        Ok((attachment, bytes))
    }

    /// Delete an attachment and its stored file.
    ///
    /// Returns `false` if the attachment did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn delete_attachment(
        &self,
        attachment_id: AttachmentId,
    ) -> Result<bool, ReconciliationError> {
        let Some(attachment) = self.repo.find_attachment(attachment_id).await? else {
            tracing::debug!(attachment_id = %attachment_id, "attachment already absent");
            return Ok(false);
        };

        self.remove_file(&attachment.storage_key).await;
        let removed = self.repo.delete_attachment(attachment_id).await?;

        tracing::info!(attachment_id = %attachment_id, "attachment deleted");
        Ok(removed)
    }

    /// Delete a payment record after removing its attachments and files.
    ///
    /// Returns `false` if the record did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn delete_payment_record(
        &self,
        record_id: PaymentRecordId,
    ) -> Result<bool, ReconciliationError> {
        if self.repo.find_payment_record(record_id).await?.is_none() {
            tracing::debug!(record_id = %record_id, "payment record already absent");
            return Ok(false);
        }

        for attachment in self.repo.list_attachments(&[record_id]).await? {
            self.remove_file(&attachment.storage_key).await;
            self.repo.delete_attachment(attachment.id).await?;
        }

        let removed = self.repo.delete_payment_record(record_id).await?;
        tracing::info!(record_id = %record_id, "payment record deleted");
        Ok(removed)
    }

    /// Finalized projects with their reconciliation progress, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_reconcilable_projects(
        &self,
    ) -> Result<Vec<ProjectSummary>, ReconciliationError> {
        let projects = self
            .repo
            .list_projects(Some(ProjectStatus::Finalized))
            .await?;

        let mut summaries = Vec::with_capacity(projects.len());
        for project in &projects {
            let records = self.repo.list_payment_records(project.id).await?;
            summaries.push(ReportService::summarize(project, &records));
        }

        Ok(summaries)
    }

    /// Aggregate reconciliation progress over all finalized projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn build_consolidated_report(
        &self,
    ) -> Result<ConsolidatedReport, ReconciliationError> {
        let summaries = self.list_reconcilable_projects().await?;
        Ok(ReportService::consolidate(summaries))
    }

    /// Delete a stored file, logging instead of failing.
    async fn remove_file(&self, storage_key: &str) {
        if let Err(e) = self.storage.delete(storage_key).await {
            tracing::warn!(
                storage_key = %storage_key,
                error = %e,
                "failed to delete stored file"
            );
        }
    }
}

fn provided_description(input: &UpsertPaymentInput) -> Option<String> {
    input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
