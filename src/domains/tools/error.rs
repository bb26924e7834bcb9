//! Tool-specific error types.

use thiserror::Error;

use crate::dataverse::DataverseError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Arguments did not match the tool's declared parameter shape.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The Dataverse service failed; the message is passed through unchanged.
    #[error(transparent)]
    Service(#[from] DataverseError),

    /// A service value could not be rendered as JSON text.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}
