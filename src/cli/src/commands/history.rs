//! History command for the CLI client.

use crate::client::{result_amount, rpc_call};
use crate::config::CliConfig;
use crate::errors::CliError;
use millpond_core::format_amount;
use serde_json::json;

/// Runs the history command, printing pool events in call order.
pub async fn run(config: &CliConfig) -> Result<(), CliError> {
    let result = rpc_call(&config.node, "getPoolHistory", json!([])).await?;

    let events = match result.as_array() {
        Some(events) => events,
        None => {
            return Err(CliError::NodeRequestFailed(format!(
                "Invalid history format: {}",
                result
            )));
        }
    };

    if events.is_empty() {
        println!("No pool events recorded");
        return Ok(());
    }

    for event in events {
        let kind = event.get("type").and_then(|v| v.as_str()).unwrap_or("?");
        let user = event.get("user").and_then(|v| v.as_str()).unwrap_or("?");
        let timestamp = event
            .get("timestamp")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let amount = match event.get("amount") {
            Some(amount) => result_amount(amount)
                .map(format_amount)
                .unwrap_or_else(|_| "?".to_string()),
            None => "?".to_string(),
        };

        println!("[{}] {} {} by {}", timestamp, kind, amount, user);
    }

    Ok(())
}
