//! Mint command for the CLI client.

use crate::client::{format_address, parse_human_amount, resolve_address, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::Balance;
use serde_json::json;
use tracing::info;

/// Runs the mint command. The caller must hold the minter role.
pub async fn run(
    config: &CliConfig,
    from: &str,
    to: &str,
    amount: &str,
) -> Result<Balance, CliError> {
    let from = resolve_address(from)?;
    let to = resolve_address(to)?;
    let amount = parse_human_amount(amount)?;
    info!("Minting {} base units to 0x{}", amount, hex::encode(to));

    rpc_call(
        &config.node,
        "mint",
        json!([
            format_address(&from),
            format_address(&to),
            amount.to_string()
        ]),
    )
    .await?;

    Ok(amount)
}
