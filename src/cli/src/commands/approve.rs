//! Approve command for the CLI client.

use crate::client::{format_address, parse_human_amount, resolve_address, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::Balance;
use serde_json::json;

/// Runs the approve command, setting a spender allowance on the token ledger.
pub async fn run(
    config: &CliConfig,
    from: &str,
    spender: &str,
    amount: &str,
) -> Result<Balance, CliError> {
    let from = resolve_address(from)?;
    let spender = resolve_address(spender)?;
    let amount = parse_human_amount(amount)?;

    rpc_call(
        &config.node,
        "approve",
        json!([
            format_address(&from),
            format_address(&spender),
            amount.to_string()
        ]),
    )
    .await?;

    Ok(amount)
}
