//! Error classification shared by the core services.

use thiserror::Error;

/// Boundary classification of a domain error.
///
/// Callers map this onto their own response codes; `NotFound`, `Validation`,
/// `TooLarge` and `UnsupportedType` are caller-recoverable, `Storage` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced project, record, planning row or attachment is absent.
    NotFound,
    /// Bad enum value, negative amount or malformed input.
    Validation,
    /// Upload exceeds the configured size cap.
    TooLarge,
    /// Upload content type is not accepted.
    UnsupportedType,
    /// Persistence or filesystem failure.
    Storage,
}

/// Errors returned by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write (natural key or attachment slot).
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// Stored data could not be mapped back to the domain model.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// The backend failed to execute the operation.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Create a conflict error.
    #[must_use]
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a corrupt row error.
    #[must_use]
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }

    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
