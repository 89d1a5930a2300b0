//! Reconciliation error types.

use thiserror::Error;
use uuid::Uuid;

use palco_shared::types::{AttachmentId, PaymentRecordId, ProjectId};

use super::types::Origin;
use crate::error::{ErrorKind, RepositoryError};
use crate::storage::StorageError;

/// Reconciliation Engine errors.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// Project not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Source planning row not found in the project.
    #[error("{origin} item not found: {id}")]
    SourceItemNotFound {
        /// Planning list searched.
        origin: Origin,
        /// Requested row ID.
        id: Uuid,
    },

    /// Payment record not found.
    #[error("payment record not found: {0}")]
    PaymentRecordNotFound(PaymentRecordId),

    /// Attachment not found.
    #[error("attachment not found: {0}")]
    AttachmentNotFound(AttachmentId),

    /// Attachment row exists but its stored file is gone.
    #[error("attachment file missing: {0}")]
    AttachmentFileMissing(AttachmentId),

    /// Origin is not one of `roster`, `plan`.
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),

    /// Attachment kind is not one of `receipt`, `invoice`.
    #[error("invalid attachment kind: {0}")]
    InvalidAttachmentKind(String),

    /// Amount is negative, above the ceiling, or not a number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Attachment file name is blank or too long.
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    /// File storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ReconciliationError {
    /// Create a source item not found error.
    #[must_use]
    pub fn source_item_not_found(origin: Origin, id: Uuid) -> Self {
        Self::SourceItemNotFound { origin, id }
    }

    /// Create an invalid origin error.
    #[must_use]
    pub fn invalid_origin(value: impl Into<String>) -> Self {
        Self::InvalidOrigin(value.into())
    }

    /// Create an invalid attachment kind error.
    #[must_use]
    pub fn invalid_attachment_kind(value: impl Into<String>) -> Self {
        Self::InvalidAttachmentKind(value.into())
    }

    /// Create an invalid amount error.
    #[must_use]
    pub fn invalid_amount(value: impl Into<String>) -> Self {
        Self::InvalidAmount(value.into())
    }

    /// Create an invalid file name error.
    #[must_use]
    pub fn invalid_file_name(value: impl Into<String>) -> Self {
        Self::InvalidFileName(value.into())
    }

    /// Classify this error for the boundary.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProjectNotFound(_)
            | Self::SourceItemNotFound { .. }
            | Self::PaymentRecordNotFound(_)
            | Self::AttachmentNotFound(_)
            | Self::AttachmentFileMissing(_) => ErrorKind::NotFound,
            Self::InvalidOrigin(_)
            | Self::InvalidAttachmentKind(_)
            | Self::InvalidAmount(_)
            | Self::InvalidFileName(_) => ErrorKind::Validation,
            Self::Storage(StorageError::FileTooLarge { .. }) => ErrorKind::TooLarge,
            Self::Storage(StorageError::UnsupportedContentType { .. }) => ErrorKind::UnsupportedType,
            Self::Storage(StorageError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Storage(_) | Self::Repository(_) => ErrorKind::Storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            ReconciliationError::ProjectNotFound(ProjectId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ReconciliationError::source_item_not_found(Origin::Plan, Uuid::now_v7()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ReconciliationError::invalid_amount("-1").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ReconciliationError::from(StorageError::file_too_large(11, 10)).kind(),
            ErrorKind::TooLarge
        );
        assert_eq!(
            ReconciliationError::from(StorageError::unsupported_content_type("application/zip")).kind(),
            ErrorKind::UnsupportedType
        );
        assert_eq!(
            ReconciliationError::from(RepositoryError::backend("connection reset")).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn test_source_item_message() {
        let id = Uuid::nil();
        let err = ReconciliationError::source_item_not_found(Origin::Roster, id);
        assert_eq!(err.to_string(), format!("roster item not found: {id}"));
    }
}
