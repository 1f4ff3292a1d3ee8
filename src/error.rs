//! Error types for jsontable
//!
//! Provides a unified error type for all table operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using TableError
pub type Result<T> = std::result::Result<T, TableError>;

/// Unified error type for jsontable operations
#[derive(Debug, Error)]
pub enum TableError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Table File Errors
    // -------------------------------------------------------------------------
    #[error("Table file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Table file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Corrupt table data in {}: {reason}", path.display())]
    CorruptData { path: PathBuf, reason: String },

    // -------------------------------------------------------------------------
    // Locking / Persistence Errors
    // -------------------------------------------------------------------------
    #[error("Can't acquire file lock: {0}")]
    Lock(String),

    #[error("Can't write data to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Registry / Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),
}
