//! Configuration for the node daemon.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the node daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// RPC configuration
    pub rpc: RpcConfig,
    /// Metrics configuration
    pub metrics: MetricsConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Genesis configuration, used only when no saved state exists
    pub genesis: GenesisConfig,
}

/// RPC configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Listen address for the RPC server
    pub listen_addr: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether to enable the metrics server
    pub enabled: bool,
    /// Listen address for the metrics server
    pub listen_addr: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the data directory; empty means the platform data directory
    pub data_dir: String,
}

/// Genesis configuration.
///
/// Consulted only on first start, when the store holds no snapshot.
/// Subsequent starts load the saved state and ignore this section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Hex address granted admin on both ledgers
    pub admin_address: String,
    /// Initial ledger units minted per reserve unit
    pub exchange_rate: u64,
    /// Name of the issued token
    pub token_name: String,
    /// Symbol of the issued token
    pub token_symbol: String,
    /// Name of the reserve asset
    pub reserve_name: String,
    /// Symbol of the reserve asset
    pub reserve_symbol: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig {
                listen_addr: "127.0.0.1:8545".to_string(),
            },
            metrics: MetricsConfig {
                enabled: false,
                listen_addr: "127.0.0.1:9090".to_string(),
            },
            storage: StorageConfig {
                data_dir: String::new(),
            },
            genesis: GenesisConfig {
                admin_address: String::new(),
                exchange_rate: 100,
                token_name: "Millpond Token".to_string(),
                token_symbol: "MILL".to_string(),
                reserve_name: "USD Coin".to_string(),
                reserve_symbol: "USDC".to_string(),
            },
        }
    }
}

impl NodeConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
