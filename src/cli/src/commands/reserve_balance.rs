//! Reserve balance command for the CLI client.

use crate::client::{format_address, resolve_address, result_amount, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::Balance;
use serde_json::json;

/// Runs the reserve-balance command.
pub async fn run(config: &CliConfig, account: &str) -> Result<Balance, CliError> {
    let address = resolve_address(account)?;

    println!("Account: {}", format_address(&address));

    let result = rpc_call(
        &config.node,
        "getReserveBalance",
        json!([format_address(&address)]),
    )
    .await?;
    result_amount(&result)
}
