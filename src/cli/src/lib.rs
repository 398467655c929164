//! CLI client for the millpond node.

pub mod client;
pub mod commands;
pub mod config;
pub mod errors;

// Re-export commonly used types and functions
pub use client::{format_address, parse_human_amount, resolve_address};
pub use config::CliConfig;
pub use errors::CliError;
