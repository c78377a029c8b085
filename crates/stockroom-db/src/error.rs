//! # Store Error Types
//!
//! Error types for product store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  AddressError / ValidationError (stockroom-core)                       │
//! │       │   raised before any SQL runs                                    │
//! │       ▼                                                                 │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │   mapped per operation (insert → InsertFailed, ...)             │
//! │       ▼                                                                 │
//! │  DbError (this module)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UI layer decides the wording (toast, dialog)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A row that does not exist is not an error: update and delete report
//! a count of 0 instead.

use stockroom_core::{AddressError, ValidationError};
use thiserror::Error;

/// Product store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Malformed or unsupported address.
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    /// A field failed validation. Nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The insert did not persist. No partial row exists.
    ///
    /// ## When This Occurs
    /// - Pool closed or database file unavailable
    /// - Disk full
    /// - A CHECK constraint rejected the row
    #[error("Insert failed: {0}")]
    InsertFailed(String),

    /// An update or delete did not persist. Prior state is untouched.
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// `next()` called on a cursor after `close()`.
    #[error("Cursor is closed")]
    CursorClosed,

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Configuration could not be loaded, saved or validated.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Re-labels a storage failure raised during an insert.
    ///
    /// Validation and address errors pass through unchanged.
    pub fn into_insert_failure(self) -> Self {
        match self {
            DbError::InvalidAddress(_) | DbError::Validation(_) | DbError::InsertFailed(_) => self,
            other => DbError::InsertFailed(other.to_string()),
        }
    }

    /// Re-labels a storage failure raised during an update or delete.
    pub fn into_write_failure(self) -> Self {
        match self {
            DbError::InvalidAddress(_) | DbError::Validation(_) | DbError::WriteFailed(_) => self,
            other => DbError::WriteFailed(other.to_string()),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → QueryFailed (message kept)
/// sqlx::Error::PoolTimedOut   → PoolExhausted
/// sqlx::Error::PoolClosed     → ConnectionFailed
/// Other                       → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        DbError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for DbError {
    fn from(err: toml::de::Error) -> Self {
        DbError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DbError {
    fn from(err: toml::ser::Error) -> Self {
        DbError::Config(err.to_string())
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
