//! JSON-RPC plumbing shared by the CLI commands.
//!
//! The node identifies callers by the address in the request, so the client
//! carries no keys. Accounts are addressed either as 32-byte hex strings or
//! as free-form labels that hash to an address.

use crate::errors::CliError;
use millpond_core::{parse_amount, Address, Balance};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Sends a JSON-RPC request to the node and returns the `result` field.
pub async fn rpc_call(node_url: &str, method: &str, params: Value) -> Result<Value, CliError> {
    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1
    });

    // Make sure to append /rpc to the node URL
    let rpc_url = if node_url.ends_with("/rpc") {
        node_url.to_string()
    } else {
        format!("{}/rpc", node_url)
    };

    let client = reqwest::Client::new();
    let response = client
        .post(&rpc_url)
        .json(&request)
        .send()
        .await
        .map_err(|e| CliError::NetworkError(e.to_string()))?;

    let response_text = response
        .text()
        .await
        .map_err(|e| CliError::NetworkError(format!("Failed to get response text: {}", e)))?;
    debug!("Raw response: {}", response_text);

    // If the response is empty, return an error
    if response_text.is_empty() {
        return Err(CliError::NetworkError(
            "Empty response from node".to_string(),
        ));
    }

    let response: Value = serde_json::from_str(&response_text)
        .map_err(|e| CliError::NetworkError(format!("Failed to parse response: {}", e)))?;

    // Check for errors in the response
    if let Some(error) = response.get("error") {
        if !error.is_null() {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.to_string());
            return Err(CliError::NodeRequestFailed(message));
        }
    }

    let result = response.get("result").ok_or_else(|| {
        CliError::NodeRequestFailed(format!("No result in response: {}", response_text))
    })?;

    Ok(result.clone())
}

/// Resolves a user-supplied account name to an address.
///
/// A 64-character hex string (with optional `0x` prefix) decodes directly.
/// Anything else is treated as a label and hashed, so accounts can be
/// referred to by name. The pool itself answers to the label
/// `millpond-pool`.
pub fn resolve_address(input: &str) -> Result<Address, CliError> {
    let trimmed = input.trim_start_matches("0x");
    if trimmed.len() == 64 {
        let bytes = hex::decode(trimmed)
            .map_err(|e| CliError::InvalidAddress(format!("{}: {}", input, e)))?;
        let mut address = [0u8; 32];
        address.copy_from_slice(&bytes);
        return Ok(address);
    }

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    Ok(hasher.finalize().into())
}

/// Parses a human decimal amount ("1.5") into base units.
pub fn parse_human_amount(input: &str) -> Result<Balance, CliError> {
    parse_amount(input).ok_or_else(|| CliError::InvalidAmount(input.to_string()))
}

/// Reads a base-unit amount out of an RPC result.
///
/// The node encodes amounts as decimal strings because u128 does not
/// survive a JSON number, but older handlers may answer with plain numbers.
pub fn result_amount(result: &Value) -> Result<Balance, CliError> {
    if let Some(s) = result.as_str() {
        return s
            .parse::<Balance>()
            .map_err(|e| CliError::NodeRequestFailed(format!("Invalid amount string: {}", e)));
    }
    if let Some(n) = result.as_u64() {
        return Ok(Balance::from(n));
    }
    Err(CliError::NodeRequestFailed(format!(
        "Invalid amount format: {}",
        result
    )))
}

/// Formats an address the way the node prints them.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}
