//! Deposit command for the CLI client.

use crate::client::{format_address, parse_human_amount, resolve_address, result_amount, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::Balance;
use serde_json::json;
use tracing::info;

/// Runs the deposit command. The caller must have approved the pool for at
/// least the deposited amount on the reserve ledger. Returns the minted
/// ledger amount in base units.
pub async fn run(config: &CliConfig, from: &str, amount: &str) -> Result<Balance, CliError> {
    let from = resolve_address(from)?;
    let amount = parse_human_amount(amount)?;
    info!("Depositing {} reserve base units", amount);

    let result = rpc_call(
        &config.node,
        "deposit",
        json!([format_address(&from), amount.to_string()]),
    )
    .await?;

    result_amount(&result)
}
