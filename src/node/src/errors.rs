//! Error types for the node daemon.

use millpond_core::CoreError;
use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur in the node daemon.
#[derive(Debug)]
pub enum NodeError {
    /// Error when a core operation fails.
    CoreError(CoreError),

    /// Error when reading or writing the state store.
    StorageError(String),

    /// Error when the configuration is invalid.
    ConfigError(String),
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::CoreError(e) => write!(f, "Core error: {}", e),
            NodeError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            NodeError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl StdError for NodeError {}

impl From<CoreError> for NodeError {
    fn from(error: CoreError) -> Self {
        NodeError::CoreError(error)
    }
}
