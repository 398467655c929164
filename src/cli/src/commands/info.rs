//! Info command for the CLI client.

use crate::client::{result_amount, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::format_amount;
use serde_json::json;

/// Runs the info command, printing the pool and both ledger summaries.
pub async fn run(config: &CliConfig) -> Result<(), CliError> {
    let info = rpc_call(&config.node, "getPoolInfo", json!([])).await?;

    if let Some(address) = info.get("address").and_then(|v| v.as_str()) {
        println!("Pool address: {}", address);
    }
    if let Some(rate) = info.get("exchange_rate").and_then(|v| v.as_str()) {
        println!("Exchange rate: {}", rate);
    }
    if let Some(custody) = info.get("reserve_custody") {
        if let Ok(custody) = result_amount(custody) {
            println!("Reserve custody: {}", format_amount(custody));
        }
    }

    print_ledger("Token", &info, "token");
    print_ledger("Reserve", &info, "reserve");

    Ok(())
}

fn print_ledger(heading: &str, info: &serde_json::Value, key: &str) {
    let section = match info.get(key) {
        Some(section) => section,
        None => return,
    };

    println!("\n{}:", heading);
    if let (Some(name), Some(symbol)) = (
        section.get("name").and_then(|v| v.as_str()),
        section.get("symbol").and_then(|v| v.as_str()),
    ) {
        println!("  {} ({})", name, symbol);
    }
    if let Some(supply) = section.get("total_supply") {
        if let Ok(supply) = result_amount(supply) {
            println!("  Total supply: {}", format_amount(supply));
        }
    }
    if let Some(paused) = section.get("paused").and_then(|v| v.as_bool()) {
        println!("  Paused: {}", paused);
    }
}
