//! Node daemon for the reserve-backed token mill.
//!
//! The node owns one `LiquidityPool` behind a single mutex, snapshots
//! it to RocksDB after every mutation, and exposes it over JSON-RPC
//! with an optional Prometheus endpoint.

pub mod config;
pub mod errors;
pub mod genesis;
pub mod metrics;
pub mod rpc;
pub mod store;
