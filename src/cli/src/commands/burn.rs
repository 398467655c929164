//! Burn command for the CLI client.

use crate::client::{format_address, parse_human_amount, resolve_address, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::Balance;
use serde_json::json;

/// Runs the burn command, destroying tokens from the caller's own balance.
pub async fn run(config: &CliConfig, from: &str, amount: &str) -> Result<Balance, CliError> {
    let from = resolve_address(from)?;
    let amount = parse_human_amount(amount)?;

    rpc_call(
        &config.node,
        "burn",
        json!([format_address(&from), amount.to_string()]),
    )
    .await?;

    Ok(amount)
}
