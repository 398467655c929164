//! Withdraw command for the CLI client.

use crate::client::{format_address, parse_human_amount, resolve_address, result_amount, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::Balance;
use serde_json::json;
use tracing::info;

/// Runs the withdraw command. The caller must have approved the pool for at
/// least the burned amount on the token ledger. Returns the reserve amount
/// paid out in base units, which rounds down at the exchange rate.
pub async fn run(config: &CliConfig, from: &str, amount: &str) -> Result<Balance, CliError> {
    let from = resolve_address(from)?;
    let amount = parse_human_amount(amount)?;
    info!("Withdrawing against {} ledger base units", amount);

    let result = rpc_call(
        &config.node,
        "withdraw",
        json!([format_address(&from), amount.to_string()]),
    )
    .await?;

    result_amount(&result)
}
