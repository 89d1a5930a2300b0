//! Repository implementations for data access.
//!
//! [`PgRepository`] implements the core repository traits on PostgreSQL via
//! `SeaORM`; [`Repository`] selects between it and the in-memory backend at
//! startup.

mod backend;
mod payment;
mod planning;
mod project;

pub use backend::Repository;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use palco_core::RepositoryError;

/// PostgreSQL repository implementing every core repository trait.
#[derive(Debug, Clone)]
pub struct PgRepository {
    db: DatabaseConnection,
}

impl PgRepository {
    /// Create a new PostgreSQL repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get the underlying connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Map a database error, surfacing unique violations as conflicts.
pub(crate) fn map_db_err(err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepositoryError::conflict(detail),
        _ => RepositoryError::backend(err.to_string()),
    }
}

/// Error for a stored value that does not map onto a domain enum.
pub(crate) fn corrupt(column: &str, value: &str) -> RepositoryError {
    RepositoryError::corrupt(format!("unexpected {column} value '{value}'"))
}
