//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Operator, services};

use palco_shared::types::{AttachmentId, PaymentRecordId, ProjectId};

use super::config::{StorageConfig, StorageProvider};
use super::error::{StorageAction, StorageError};

/// Where an uploaded file lands in the object store.
#[derive(Debug, Clone)]
pub struct UploadTarget<'a> {
    /// Project owning the payment record.
    pub project_id: ProjectId,
    /// Payment record the file is attached to.
    pub payment_record_id: PaymentRecordId,
    /// Attachment slot name (`receipt`, `invoice`).
    pub slot: &'a str,
    /// Attachment ID.
    pub attachment_id: AttachmentId,
    /// Original filename.
    pub filename: &'a str,
}

/// Storage service for payment attachments.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish(),
        };

        Ok(operator)
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::unsupported_content_type(content_type));
        }

        Ok(())
    }

    /// Generate storage key for an attachment.
    ///
    /// Format: `{project_id}/{payment_record_id}/{slot}/{attachment_id}-{sanitized_filename}`
    #[must_use]
    pub fn generate_storage_key(target: &UploadTarget<'_>) -> String {
        format!(
            "{}/{}/{}/{}-{}",
            target.project_id,
            target.payment_record_id,
            target.slot,
            target.attachment_id,
            sanitize_filename(target.filename)
        )
    }

    /// Store bytes under `key`, overwriting any previous object.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn put(&self, key: &str, data: Bytes) -> Result<(), StorageError> {
        self.operator
            .write(key, data)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::backend(StorageAction::Write, key, &e))
    }

    /// Read the full object stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing is stored under `key`.
    pub async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        self.operator
            .read(key)
            .await
            .map(|buffer| buffer.to_bytes())
            .map_err(|e| StorageError::backend(StorageAction::Read, key, &e))
    }

    /// Delete a file from storage.
    ///
    /// Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator
            .delete(key)
            .await
            .map_err(|e| StorageError::backend(StorageAction::Delete, key, &e))
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_service() -> StorageService {
        StorageService::from_config(StorageConfig::new(StorageProvider::Memory))
            .expect("memory storage")
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("recibo.pdf"), "recibo.pdf");
        assert_eq!(sanitize_filename("nota fiscal (1).pdf"), "nota_fiscal__1_.pdf");
        assert_eq!(sanitize_filename("comprovação.pdf"), "comprova__o.pdf");
    }

    #[test]
    fn test_generate_storage_key() {
        let target = UploadTarget {
            project_id: ProjectId::new(),
            payment_record_id: PaymentRecordId::new(),
            slot: "receipt",
            attachment_id: AttachmentId::new(),
            filename: "recibo março.pdf",
        };

        let key = StorageService::generate_storage_key(&target);
        let parts: Vec<&str> = key.split('/').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], target.project_id.to_string());
        assert_eq!(parts[1], target.payment_record_id.to_string());
        assert_eq!(parts[2], "receipt");
        assert!(parts[3].starts_with(&target.attachment_id.to_string()));
        assert!(parts[3].ends_with("recibo_mar_o.pdf"));
    }

    #[test]
    fn test_validate_upload_size() {
        let config = StorageConfig::new(StorageProvider::Memory).with_max_file_size(1024);
        let service = StorageService::from_config(config).expect("should create service");

        assert!(service.validate_upload("application/pdf", 1024).is_ok());

        let err = service
            .validate_upload("application/pdf", 1025)
            .unwrap_err();
        assert!(matches!(err, StorageError::FileTooLarge { .. }));
    }

    #[test]
    fn test_validate_upload_mime_type() {
        let service = memory_service();

        assert!(service.validate_upload("application/pdf", 1024).is_ok());
        assert!(service.validate_upload("image/png", 1024).is_ok());

        let err = service
            .validate_upload("application/zip", 1024)
            .unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedContentType { .. }));
    }

    #[tokio::test]
    async fn test_put_read_delete() {
        let service = memory_service();
        let key = "p/r/receipt/a-file.pdf";

        service
            .put(key, Bytes::from_static(b"%PDF-1.7"))
            .await
            .unwrap();
        assert!(service.exists(key).await);
        assert_eq!(service.read(key).await.unwrap(), Bytes::from_static(b"%PDF-1.7"));

        service.delete(key).await.unwrap();
        assert!(!service.exists(key).await);
        assert!(matches!(
            service.read(key).await,
            Err(StorageError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let service = memory_service();
        assert!(service.delete("never/written.pdf").await.is_ok());
    }
}
