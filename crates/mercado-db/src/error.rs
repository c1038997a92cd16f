//! Store error types.

use thiserror::Error;

/// Errors that can occur when using the store.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open or read the backing file.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to write the backing file.
    #[error("Failed to persist store: {0}")]
    PersistError(String),

    /// Failed to (de)serialize the state document.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failed to take the cross-process lock on the backing file.
    #[error("Failed to lock store: {0}")]
    LockError(String),

    /// A row with the same key already exists.
    #[error("Unique constraint violated on {table}: {key}")]
    UniqueViolation { table: &'static str, key: String },

    /// A writer panicked while holding the lock.
    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::SerializationError(e.to_string())
    }
}
