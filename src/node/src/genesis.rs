//! Genesis state construction for a fresh node.

use crate::config::NodeConfig;
use crate::errors::NodeError;
use millpond_core::{Address, Balance, LiquidityPool, Role, TokenLedger};
use sha2::{Digest, Sha256};
use tracing::info;

/// Builds the initial state from the genesis section of the config.
///
/// Both ledgers start under one admin, and the pool address is granted
/// the minter role on the issued token so deposits can mint.
pub fn build(config: &NodeConfig) -> Result<LiquidityPool, NodeError> {
    let genesis = &config.genesis;
    let admin = parse_admin_address(&genesis.admin_address)?;

    let ledger = TokenLedger::new(&genesis.token_name, &genesis.token_symbol, &admin);
    let reserve = TokenLedger::new(&genesis.reserve_name, &genesis.reserve_symbol, &admin);

    let pool_address = pool_address();
    let mut pool = LiquidityPool::new(
        &pool_address,
        ledger,
        reserve,
        Balance::from(genesis.exchange_rate),
    )?;
    pool.ledger_mut()
        .grant_role(&admin, Role::Minter, &pool_address)?;

    info!(
        "Genesis state created: admin 0x{}, pool 0x{}, rate {}",
        hex::encode(admin),
        hex::encode(pool_address),
        genesis.exchange_rate
    );
    Ok(pool)
}

/// Parses the hex admin address from the genesis config.
fn parse_admin_address(address_hex: &str) -> Result<Address, NodeError> {
    if address_hex.is_empty() {
        return Err(NodeError::ConfigError(
            "genesis admin_address is not set".to_string(),
        ));
    }
    let bytes = hex::decode(address_hex.trim_start_matches("0x"))
        .map_err(|e| NodeError::ConfigError(format!("Invalid genesis admin address: {}", e)))?;
    if bytes.len() != 32 {
        return Err(NodeError::ConfigError(format!(
            "Invalid genesis admin address length: expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    let mut address = [0u8; 32];
    address.copy_from_slice(&bytes);
    Ok(address)
}

/// The pool's custody address, the hash of a fixed label so clients
/// can derive it without asking the node.
pub fn pool_address() -> Address {
    let mut hasher = Sha256::new();
    hasher.update(b"millpond-pool");
    let result = hasher.finalize();
    let mut address = [0u8; 32];
    address.copy_from_slice(&result);
    address
}
