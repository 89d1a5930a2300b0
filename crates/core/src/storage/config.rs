//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use palco_shared::StorageSettings;

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Local filesystem
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory (tests and demo mode)
    Memory,
}

impl StorageProvider {
    /// Create S3-compatible provider (Cloudflare R2, Supabase, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "fs",
            Self::Memory => "memory",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types for upload.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set allowed MIME types.
    #[must_use]
    pub fn with_allowed_mime_types(mut self, types: Vec<String>) -> Self {
        self.allowed_mime_types = types;
        self
    }

    /// Default allowed MIME types: PDF documents and common images.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        vec![
            "application/pdf".to_string(),
            "image/png".to_string(),
            "image/jpeg".to_string(),
            "image/gif".to_string(),
            "image/webp".to_string(),
        ]
    }

    /// Check if a MIME type is allowed.
    ///
    /// Parameters such as `; charset=binary` are ignored.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_mime_types.iter().any(|t| *t == essence)
    }
}

impl TryFrom<&StorageSettings> for StorageConfig {
    type Error = StorageError;

    fn try_from(settings: &StorageSettings) -> Result<Self, Self::Error> {
        let provider = match settings.provider.as_str() {
            "fs" | "local" => StorageProvider::local_fs(&settings.root),
            "memory" => StorageProvider::Memory,
            "s3" => {
                let required = |field: &Option<String>, name: &str| {
                    field
                        .clone()
                        .ok_or_else(|| StorageError::configuration(format!("storage.{name} is required for s3")))
                };
                StorageProvider::s3(
                    required(&settings.endpoint, "endpoint")?,
                    required(&settings.bucket, "bucket")?,
                    required(&settings.access_key_id, "access_key_id")?,
                    required(&settings.secret_access_key, "secret_access_key")?,
                    settings.region.clone().unwrap_or_else(|| "auto".to_string()),
                )
            }
            other => {
                return Err(StorageError::configuration(format!(
                    "unknown storage provider '{other}'"
                )));
            }
        };

        let mut config = Self::new(provider).with_max_file_size(settings.max_file_size);
        if !settings.allowed_mime_types.is_empty() {
            config = config.with_allowed_mime_types(settings.allowed_mime_types.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_provider_names() {
        let s3 = StorageProvider::s3(
            "https://account.r2.cloudflarestorage.com",
            "receipts",
            "access_key",
            "secret_key",
            "auto",
        );
        assert_eq!(s3.name(), "s3");
        assert_eq!(StorageProvider::local_fs("./uploads").name(), "fs");
        assert_eq!(StorageProvider::Memory.name(), "memory");
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::Memory);
        assert_eq!(config.max_file_size, StorageConfig::DEFAULT_MAX_FILE_SIZE);
        assert!(!config.allowed_mime_types.is_empty());
    }

    #[test]
    fn test_mime_type_validation() {
        let config = StorageConfig::new(StorageProvider::Memory);
        assert!(config.is_mime_type_allowed("application/pdf"));
        assert!(config.is_mime_type_allowed("Application/PDF; charset=binary"));
        assert!(config.is_mime_type_allowed("image/jpeg"));
        assert!(!config.is_mime_type_allowed("application/x-executable"));
        assert!(!config.is_mime_type_allowed("text/html"));
    }

    #[test]
    fn test_from_settings_memory() {
        let settings = StorageSettings {
            provider: "memory".to_string(),
            max_file_size: 1024,
            ..StorageSettings::default()
        };
        let config = StorageConfig::try_from(&settings).unwrap();
        assert_eq!(config.provider.name(), "memory");
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.allowed_mime_types, StorageConfig::default_mime_types());
    }

    #[test]
    fn test_from_settings_custom_mime_types() {
        let settings = StorageSettings {
            allowed_mime_types: vec!["application/pdf".to_string()],
            ..StorageSettings::default()
        };
        let config = StorageConfig::try_from(&settings).unwrap();
        assert_eq!(config.provider.name(), "fs");
        assert!(!config.is_mime_type_allowed("image/png"));
    }

    #[test]
    fn test_from_settings_s3_requires_bucket() {
        let settings = StorageSettings {
            provider: "s3".to_string(),
            endpoint: Some("https://s3.example.com".to_string()),
            ..StorageSettings::default()
        };
        let err = StorageConfig::try_from(&settings).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_from_settings_unknown_provider() {
        let settings = StorageSettings {
            provider: "ftp".to_string(),
            ..StorageSettings::default()
        };
        assert!(StorageConfig::try_from(&settings).is_err());
    }
}
