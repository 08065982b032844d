//! Error types for the country cache

use thiserror::Error;

/// Errors that can occur while reading or writing the cache
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: i32, found: i32 },

    /// Stored or supplied data violates the model
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A background store task did not finish
    #[error("Background task failed: {0}")]
    Background(String),
}

impl StoreError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            StoreError::SchemaVersionMismatch { expected, found } => {
                format!(
                    "Cache schema version mismatch (expected v{expected}, found v{found}).\n\n\
                    Hint: Delete the cache file and run 'country-sync sync' with a connection."
                )
            }
            StoreError::InvalidData(msg) => {
                format!(
                    "The cache contains inconsistent data: {msg}\n\n\
                    Hint: Run 'country-sync sync' with a connection to rebuild it."
                )
            }
            StoreError::Io(err) => {
                format!("Cannot access the cache file: {err}\n\nHint: Check permissions on the database directory.")
            }
            _ => self.to_string(),
        }
    }
}

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}
