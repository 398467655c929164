//! RocksDB-backed persistence for the pool state.
//!
//! The whole pool, both ledgers included, is small enough to snapshot
//! as one bincode blob under a fixed key. The node saves after every
//! mutating operation and loads once at startup.

use crate::errors::NodeError;
use millpond_core::LiquidityPool;
use rocksdb::DB;
use std::path::Path;
use std::sync::Arc;

/// Key under which the pool snapshot is stored.
const POOL_STATE_KEY: &[u8] = b"pool_state";

/// Handle to the on-disk state store.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<DB>,
}

impl StateStore {
    /// Opens the store at `path`, creating the database if missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, NodeError> {
        let mut opts = rocksdb::Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)
            .map_err(|e| NodeError::StorageError(format!("Failed to open RocksDB: {}", e)))?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Loads the saved pool state, or `None` when the store is empty.
    pub fn load(&self) -> Result<Option<LiquidityPool>, NodeError> {
        let bytes = self
            .db
            .get(POOL_STATE_KEY)
            .map_err(|e| NodeError::StorageError(format!("Failed to read pool state: {}", e)))?;
        match bytes {
            Some(bytes) => {
                let pool = bincode::deserialize(&bytes).map_err(|e| {
                    NodeError::StorageError(format!("Failed to decode pool state: {}", e))
                })?;
                Ok(Some(pool))
            }
            None => Ok(None),
        }
    }

    /// Saves the pool state, replacing any previous snapshot.
    pub fn save(&self, pool: &LiquidityPool) -> Result<(), NodeError> {
        let bytes = bincode::serialize(pool)
            .map_err(|e| NodeError::StorageError(format!("Failed to encode pool state: {}", e)))?;
        self.db
            .put(POOL_STATE_KEY, bytes)
            .map_err(|e| NodeError::StorageError(format!("Failed to write pool state: {}", e)))?;
        Ok(())
    }
}
