//! Error types for the accounting core.
//!
//! The taxonomy is closed: every failure of a core operation is one of
//! these variants, and a failed operation leaves no observable state
//! change behind.

use crate::access::Role;
use thiserror::Error;

/// Errors that can occur in the accounting core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error when the caller lacks a required role.
    #[error("Permission denied: caller does not hold the {0} role")]
    PermissionDenied(Role),

    /// Error when an amount is zero or otherwise out of domain.
    #[error("Invalid amount: {0}")]
    InvalidAmount(u128),

    /// Error when a balance check fails for a burn, transfer, or withdrawal.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// The required balance
        required: u128,
        /// The available balance
        available: u128,
    },

    /// Error when a spender exceeds an approved allowance.
    #[error("Insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance {
        /// The required allowance
        required: u128,
        /// The approved allowance
        available: u128,
    },

    /// Error when pool custody cannot cover a requested payout.
    #[error("Insufficient reserve: required {required}, available {available}")]
    InsufficientReserve {
        /// The required reserve
        required: u128,
        /// The custodied reserve
        available: u128,
    },

    /// Error when a ledger-gated operation is attempted while paused.
    #[error("Contract is paused")]
    ContractPaused,

    /// Error when an operation would break a structural invariant.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Error when an operation re-enters one already executing.
    #[error("Reentrant call rejected")]
    ReentrancyBlocked,
}
