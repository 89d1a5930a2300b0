//! Attachment file storage using Apache OpenDAL.
//!
//! Supported providers:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Local filesystem
//! - In-process memory (tests, demo mode)
//!
//! The engine only needs "store bytes, return a reference"; the reference is
//! the storage key produced by [`StorageService::generate_storage_key`].

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::{StorageAction, StorageError};
pub use service::{StorageService, UploadTarget};
