//! Error types for race store operations.
//!
//! Provides a unified error type covering query execution, pooled
//! connection checkout, row mapping, seeding, and configuration failures.

use racing_core::ValidationError;
use thiserror::Error;

/// Errors that can occur during race store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite failed to prepare or run a statement.
    #[error("database error: {0}")]
    Execution(#[from] rusqlite::Error),

    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A point lookup matched no row.
    #[error("race not found: {0}")]
    NotFound(String),

    /// A row column could not be read into the expected type.
    #[error("mapping error: {0}")]
    Mapping(String),

    /// A stored timestamp could not be interpreted.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// One-time seeding failed. Every caller of `init` sees the same message.
    #[error("initialization error: {0}")]
    Initialization(String),

    /// Table name contains characters other than ASCII alphanumerics and underscores.
    #[error("invalid table name '{0}': must contain only alphanumeric characters and underscores")]
    InvalidTableName(String),

    /// The requested order-by column is not sortable.
    #[error("invalid order field: {0}")]
    InvalidOrderField(#[from] ValidationError),

    /// Configuration file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
