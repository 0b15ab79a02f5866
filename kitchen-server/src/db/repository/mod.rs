//! Repository Module
//!
//! CRUD and query operations over the SQLite tables, as free async
//! functions taking the pool. Catalog reads apply the active-rows
//! predicate (`deleted_at IS NULL`) explicitly at every site. No default
//! scope injects it, so a missing predicate is visible in the SQL.

pub mod menu_entry;
pub mod menu_item;
pub mod modifier_group;
pub mod order;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
