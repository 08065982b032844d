//! Error types for a synchronization run

use thiserror::Error;

use crate::config::ConfigError;
use crate::source::SourceError;
use crate::store::StoreError;

/// Errors that end a synchronization run.
///
/// An unreachable source is not among them: the run falls back to the cache.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Another run, or its cache refresh, still holds the store
    #[error("A synchronization run is already in progress")]
    AlreadyRunning,

    /// The source answered with a payload that could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SyncError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            SyncError::AlreadyRunning => format!(
                "{self}.\n\nHint: Wait for the running synchronization to finish before starting another."
            ),
            SyncError::Deserialization(msg) => {
                SourceError::Deserialization(msg.clone()).user_message()
            }
            SyncError::Store(err) => err.user_message(),
            SyncError::Config(err) => err.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_carry_hints() {
        let message = SyncError::Deserialization("expected an array".to_string()).user_message();
        assert!(message.starts_with("The source returned data that could not be read: expected an array"));
        assert!(message.contains("Hint: Check that the source URL points at a country list endpoint."));

        let message = SourceError::Unavailable("connection refused".to_string()).user_message();
        assert!(message.contains("connection refused"));
        assert!(message.contains("Hint: Check network connectivity"));

        assert!(SyncError::AlreadyRunning.user_message().contains("Hint: Wait"));
    }
}
