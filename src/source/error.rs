//! Error types for the source gateway

use thiserror::Error;

/// Errors that can occur while fetching the remote record set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Transport failure or non-success response
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The payload could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl SourceError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            SourceError::Unavailable(msg) => {
                format!("Source unavailable: {msg}\n\nHint: Check network connectivity and the configured source URL.")
            }
            SourceError::Deserialization(msg) => {
                format!(
                    "The source returned data that could not be read: {msg}\n\n\
                    Hint: Check that the source URL points at a country list endpoint."
                )
            }
        }
    }
}
