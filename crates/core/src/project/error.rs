//! Project error types.

use thiserror::Error;

use palco_shared::types::ProjectId;

use crate::error::{ErrorKind, RepositoryError};

/// Project and planning management errors.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Project not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Repository failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ProjectError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Classify this error for the boundary.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Repository(_) => ErrorKind::Storage,
        }
    }
}
