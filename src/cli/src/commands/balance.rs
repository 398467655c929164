//! Balance command for the CLI client.

use crate::client::{format_address, resolve_address, result_amount, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::{format_amount, Balance};
use serde_json::json;
use tracing::{debug, info};

/// Runs the balance command.
pub async fn run(config: &CliConfig, account: &str) -> Result<Balance, CliError> {
    let address = resolve_address(account)?;
    info!("Getting balance for address: {:?}", address);

    println!("Account: {}", format_address(&address));

    let result = rpc_call(&config.node, "getBalance", json!([format_address(&address)])).await?;
    let balance = result_amount(&result)?;

    // Show the reserve side too when the node answers
    match rpc_call(
        &config.node,
        "getReserveBalance",
        json!([format_address(&address)]),
    )
    .await
    {
        Ok(result) => {
            if let Ok(reserve) = result_amount(&result) {
                println!("Reserve balance: {}", format_amount(reserve));
            }
        }
        Err(e) => {
            debug!("Failed to get reserve balance: {}", e);
        }
    }

    Ok(balance)
}
