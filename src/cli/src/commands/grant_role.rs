//! Grant role command for the CLI client.

use crate::client::{format_address, resolve_address, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use serde_json::json;
use tracing::info;

/// Runs the grant-role command. The caller must hold the admin role. The
/// role is one of `admin`, `minter` or `pauser`.
pub async fn run(config: &CliConfig, from: &str, role: &str, to: &str) -> Result<(), CliError> {
    let from = resolve_address(from)?;
    let to = resolve_address(to)?;
    info!("Granting role {} to 0x{}", role, hex::encode(to));

    rpc_call(
        &config.node,
        "grantRole",
        json!([format_address(&from), role, format_address(&to)]),
    )
    .await?;

    Ok(())
}
