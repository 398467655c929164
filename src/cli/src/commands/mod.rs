//! Commands for the CLI client.

pub mod approve;
pub mod approve_reserve;
pub mod balance;
pub mod burn;
pub mod deposit;
pub mod grant_role;
pub mod has_role;
pub mod history;
pub mod info;
pub mod mint;
pub mod mint_reserve;
pub mod pause;
pub mod reserve_balance;
pub mod revoke_role;
pub mod set_rate;
pub mod sweep;
pub mod transfer;
pub mod unpause;
pub mod withdraw;
