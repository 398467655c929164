//! Integration tests for the millpond workspace.

pub mod ledger_tests;
pub mod node_tests;
pub mod pool_tests;
