//! Payment ledger persistence contract.

use palco_shared::types::{AttachmentId, PaymentRecordId, ProjectId};

use super::attachment::{Attachment, AttachmentKind};
use super::types::{NaturalKey, PaymentRecord};
use crate::error::RepositoryError;
use crate::planning::PlanningStore;
use crate::project::ProjectRepository;

/// Repository trait for payment records and their attachments.
pub trait PaymentRepository: Send + Sync {
    /// List all payment records of a project.
    fn list_payment_records(
        &self,
        project_id: ProjectId,
    ) -> impl std::future::Future<Output = Result<Vec<PaymentRecord>, RepositoryError>> + Send;

    /// Find a payment record by ID.
    fn find_payment_record(
        &self,
        id: PaymentRecordId,
    ) -> impl std::future::Future<Output = Result<Option<PaymentRecord>, RepositoryError>> + Send;

    /// Find a payment record by its natural key.
    fn find_by_natural_key(
        &self,
        key: &NaturalKey,
    ) -> impl std::future::Future<Output = Result<Option<PaymentRecord>, RepositoryError>> + Send;

    /// Insert a payment record.
    ///
    /// Returns `RepositoryError::Conflict` if a record with the same natural
    /// key already exists.
    fn insert_payment_record(
        &self,
        record: PaymentRecord,
    ) -> impl std::future::Future<Output = Result<PaymentRecord, RepositoryError>> + Send;

    /// Overwrite the mutable fields of a payment record.
    ///
    /// Returns `false` if the record does not exist.
    fn update_payment_record(
        &self,
        record: PaymentRecord,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete a payment record together with its attachment rows.
    ///
    /// Returns `false` if the record did not exist.
    fn delete_payment_record(
        &self,
        id: PaymentRecordId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// List attachments belonging to any of the given records.
    fn list_attachments(
        &self,
        record_ids: &[PaymentRecordId],
    ) -> impl std::future::Future<Output = Result<Vec<Attachment>, RepositoryError>> + Send;

    /// Find an attachment by ID.
    fn find_attachment(
        &self,
        id: AttachmentId,
    ) -> impl std::future::Future<Output = Result<Option<Attachment>, RepositoryError>> + Send;

    /// Find the attachment occupying a slot.
    fn find_attachment_by_slot(
        &self,
        record_id: PaymentRecordId,
        kind: AttachmentKind,
    ) -> impl std::future::Future<Output = Result<Option<Attachment>, RepositoryError>> + Send;

    /// Put an attachment row into its slot, removing the row already there.
    ///
    /// The removal and the insert commit together; on error the previous
    /// occupant is left in place. Returns the displaced row, if any.
    fn replace_attachment(
        &self,
        attachment: Attachment,
    ) -> impl std::future::Future<Output = Result<Option<Attachment>, RepositoryError>> + Send;

    /// Delete an attachment row. Returns whether a row was removed.
    fn delete_attachment(
        &self,
        id: AttachmentId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}

/// Everything the Reconciliation Engine reads and writes.
pub trait ReconciliationStore: ProjectRepository + PlanningStore + PaymentRepository {}

impl<T> ReconciliationStore for T where T: ProjectRepository + PlanningStore + PaymentRepository {}
