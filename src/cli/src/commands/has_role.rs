//! Role query command for the CLI client.

use crate::client::{format_address, resolve_address, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use serde_json::json;

/// Runs the has-role command.
pub async fn run(config: &CliConfig, role: &str, account: &str) -> Result<bool, CliError> {
    let address = resolve_address(account)?;

    let result = rpc_call(
        &config.node,
        "hasRole",
        json!([role, format_address(&address)]),
    )
    .await?;

    result.as_bool().ok_or_else(|| {
        CliError::NodeRequestFailed(format!("Invalid hasRole result: {}", result))
    })
}
