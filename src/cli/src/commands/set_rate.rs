//! Exchange rate command for the CLI client.

use crate::client::{format_address, resolve_address, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use serde_json::json;
use tracing::info;

/// Runs the set-rate command. The caller must hold the admin role. The rate
/// is a whole-number multiplier, not a decimal amount, and applies only to
/// deposits and withdrawals after this call.
pub async fn run(config: &CliConfig, from: &str, rate: u64) -> Result<(), CliError> {
    let from = resolve_address(from)?;
    info!("Setting exchange rate to {}", rate);

    rpc_call(
        &config.node,
        "updateExchangeRate",
        json!([format_address(&from), rate.to_string()]),
    )
    .await?;

    Ok(())
}
