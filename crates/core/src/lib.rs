//! Core business logic for Palco.
//!
//! This crate contains the domain model and services with ZERO web or database
//! dependencies. Persistence is reached through repository traits implemented
//! by the db crate and by [`memory::MemoryRepository`].
//!
//! # Modules
//!
//! - `project` - Project drafting and lifecycle
//! - `planning` - Technical staff roster and communication plan (Planning Store)
//! - `reconciliation` - Payment view, upsert by natural key, attachment slots
//! - `report` - Consolidated reconciliation report
//! - `storage` - Attachment file storage on Apache OpenDAL
//! - `memory` - In-memory repository backend

pub mod error;
pub mod memory;
pub mod planning;
pub mod project;
pub mod reconciliation;
pub mod report;
pub mod storage;

pub use error::{ErrorKind, RepositoryError};
