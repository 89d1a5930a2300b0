//! Attachment storage errors.

use thiserror::Error;

/// What the store was doing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAction {
    /// Writing an uploaded file.
    Write,
    /// Reading a file back for download.
    Read,
    /// Removing a replaced or orphaned file.
    Delete,
}

impl std::fmt::Display for StorageAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Write => "write",
            Self::Read => "read",
            Self::Delete => "delete",
        })
    }
}

/// Errors raised while validating, storing or fetching attachment files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload is larger than `storage.max_file_size`.
    #[error("attachment of {size} bytes exceeds the {max} byte limit")]
    FileTooLarge {
        /// Upload size.
        size: u64,
        /// Configured cap.
        max: u64,
    },

    /// Content type outside the attachment allow-list.
    #[error("content type '{content_type}' is not accepted for receipts or invoices")]
    UnsupportedContentType {
        /// Declared content type of the upload.
        content_type: String,
    },

    /// Nothing is stored under the key.
    #[error("no stored file at {key}")]
    NotFound {
        /// Storage key of the missing file.
        key: String,
    },

    /// The `[storage]` settings cannot produce a working store.
    #[error("invalid storage settings: {0}")]
    Configuration(String),

    /// The provider failed while handling a file.
    #[error("storage {action} failed for {key}: {message}")]
    Backend {
        /// Operation that failed.
        action: StorageAction,
        /// Storage key involved.
        key: String,
        /// Provider message.
        message: String,
    },
}

impl StorageError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create an unsupported content type error.
    #[must_use]
    pub fn unsupported_content_type(content_type: impl Into<String>) -> Self {
        Self::UnsupportedContentType {
            content_type: content_type.into(),
        }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Wrap a provider error, keeping the key it concerned.
    ///
    /// A provider `NotFound` becomes [`StorageError::NotFound`].
    #[must_use]
    pub fn backend(action: StorageAction, key: &str, err: &opendal::Error) -> Self {
        if err.kind() == opendal::ErrorKind::NotFound {
            return Self::not_found(key);
        }
        Self::Backend {
            action,
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}
