//! Error types for the CLI client.

use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur in the CLI client.
#[derive(Debug)]
pub enum CliError {
    /// Error when the node cannot be reached.
    NetworkError(String),

    /// Error when the node answers a request with an error.
    NodeRequestFailed(String),

    /// Error when an address is invalid.
    InvalidAddress(String),

    /// Error when an amount is invalid.
    InvalidAmount(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            CliError::NodeRequestFailed(msg) => write!(f, "Node request failed: {}", msg),
            CliError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            CliError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
        }
    }
}

impl StdError for CliError {}
