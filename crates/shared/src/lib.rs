//! Shared types, errors, and configuration for Palco.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseBackend, DatabaseConfig, ServerConfig, StorageSettings};
pub use error::{AppError, AppResult};
