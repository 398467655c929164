//! Reserve sweep command for the CLI client.

use crate::client::{format_address, parse_human_amount, resolve_address, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::Balance;
use serde_json::json;
use tracing::info;

/// Runs the sweep command, moving reserve out of pool custody to a chosen
/// recipient. The caller must hold the admin role. Swept reserve no longer
/// backs circulating tokens, so later withdrawals can fail.
pub async fn run(
    config: &CliConfig,
    from: &str,
    to: &str,
    amount: &str,
) -> Result<Balance, CliError> {
    let from = resolve_address(from)?;
    let to = resolve_address(to)?;
    let amount = parse_human_amount(amount)?;
    info!(
        "Sweeping {} reserve base units to 0x{}",
        amount,
        hex::encode(to)
    );

    rpc_call(
        &config.node,
        "withdrawReserve",
        json!([
            format_address(&from),
            format_address(&to),
            amount.to_string()
        ]),
    )
    .await?;

    Ok(amount)
}
