//! Unpause command for the CLI client.

use crate::client::{format_address, resolve_address, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use serde_json::json;
use tracing::info;

/// Runs the unpause command. The caller must hold the pauser role.
pub async fn run(config: &CliConfig, from: &str) -> Result<(), CliError> {
    let from = resolve_address(from)?;
    info!("Unpausing the token ledger");

    rpc_call(&config.node, "unpause", json!([format_address(&from)])).await?;

    Ok(())
}
