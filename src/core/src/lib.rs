//! Core primitives for the reserve-backed token mill.
//!
//! This crate provides the accounting state machine: role-based access
//! control, pausable token ledgers with allowances, and the liquidity
//! pool that custodies a reserve asset against minted tokens. All state
//! lives in plain owned structures; persistence and transport are the
//! node's concern.

pub mod access;
pub mod errors;
pub mod ledger;
pub mod pool;
pub mod types;

// Re-export commonly used types
pub use access::{AccessControl, Role};
pub use errors::CoreError;
pub use ledger::TokenLedger;
pub use pool::{LiquidityPool, PoolEvent};
pub use types::{format_amount, parse_amount, Address, Balance, DECIMALS, UNIT};
