//! Repository Module
//!
//! Function-based CRUD modules over the SQLite pool. Repositories only
//! move rows; domain rules (transition legality, cost freezing, money
//! math) live in the `orders` and `reports` modules.

pub mod notification;
pub mod order;
pub mod product;
pub mod report;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Storage busy: {0}")]
    Busy(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let msg = db.message();
            if msg.contains("database is locked") || msg.contains("database table is locked") {
                return RepoError::Busy(msg.to_string());
            }
            if msg.contains("UNIQUE constraint failed") {
                return RepoError::Duplicate(msg.to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl RepoError {
    /// Transient contention the caller may retry (busy/locked)
    pub fn is_busy(&self) -> bool {
        matches!(self, RepoError::Busy(_))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
