//! Storage error types
//!
//! Defines the errors that can surface from the persistence layer.
//! Unparseable stored data is not an error: the repository degrades it to an
//! empty collection or default settings.

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation on the backing store failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a record for writing failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backing store lock was poisoned by a panicking writer
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
