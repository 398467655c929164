//! The role-gated fungible token ledger.
//!
//! Balances are fixed-point with six fractional decimal digits. Minting
//! and pausing are role-gated through [`AccessControl`]; transfers and
//! burns follow standard allowance semantics. After every successful
//! operation the sum of all balances equals the total supply, and any
//! failed operation leaves the ledger untouched.

use crate::access::{AccessControl, Role};
use crate::errors::CoreError;
use crate::types::{Address, Balance, DECIMALS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// A fixed-point fungible ledger with role-gated minting and pausing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenLedger {
    /// Human-readable token name
    name: String,
    /// Short ticker symbol
    symbol: String,
    /// Balances by address
    balances: HashMap<Address, Balance>,
    /// Remaining spend limits by (owner, spender)
    allowances: HashMap<(Address, Address), Balance>,
    /// Sum of all balances
    total_supply: Balance,
    /// When set, transfer, mint, and burn are rejected
    paused: bool,
    /// Role table consulted for privileged operations
    roles: AccessControl,
}

impl TokenLedger {
    /// Creates an empty ledger whose `initial_admin` holds the admin,
    /// minter, and pauser roles.
    pub fn new(name: &str, symbol: &str, initial_admin: &Address) -> Self {
        let mut roles = AccessControl::new(initial_admin);
        roles.grant_unchecked(Role::Minter, initial_admin);
        roles.grant_unchecked(Role::Pauser, initial_admin);

        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
            paused: false,
            roles,
        }
    }

    /// Returns the token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the number of fractional decimal digits.
    pub fn decimals(&self) -> u32 {
        DECIMALS
    }

    /// Returns the balance of `address`, zero if it has none.
    pub fn balance_of(&self, address: &Address) -> Balance {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// Returns the remaining allowance granted by `owner` to `spender`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Returns the total supply.
    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    /// Returns whether the ledger is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns the role table.
    pub fn roles(&self) -> &AccessControl {
        &self.roles
    }

    /// Returns whether `address` holds `role` in this ledger's table.
    pub fn has_role(&self, role: Role, address: &Address) -> bool {
        self.roles.has_role(role, address)
    }

    /// Grants `role` to `address`; `caller` must hold admin.
    ///
    /// Role administration is not gated by the pause flag.
    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        address: &Address,
    ) -> Result<(), CoreError> {
        self.roles.grant_role(caller, role, address)
    }

    /// Revokes `role` from `address`; `caller` must hold admin.
    ///
    /// Revoking the last admin fails with `InvariantViolation`.
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        address: &Address,
    ) -> Result<(), CoreError> {
        self.roles.revoke_role(caller, role, address)
    }

    /// Mints `amount` new units to `to`.
    ///
    /// # Arguments
    /// * `caller` - Must hold the minter role
    /// * `to` - The recipient of the newly minted units
    /// * `amount` - Must be positive
    ///
    /// # Returns
    /// `ContractPaused` while paused, `PermissionDenied` without the
    /// minter role, `InvalidAmount` for zero or an amount that would
    /// overflow the supply.
    pub fn mint(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        self.ensure_not_paused()?;
        self.roles.require(Role::Minter, caller)?;
        if amount == 0 {
            return Err(CoreError::InvalidAmount(0));
        }

        let new_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(CoreError::InvalidAmount(amount))?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(CoreError::InvalidAmount(amount))?;

        self.balances.insert(*to, new_balance);
        self.total_supply = new_supply;

        debug!("Minted {} units of {} to {:?}", amount, self.symbol, to);
        Ok(())
    }

    /// Burns `amount` units from the caller's own balance.
    ///
    /// A zero burn succeeds without touching the ledger.
    pub fn burn(&mut self, caller: &Address, amount: Balance) -> Result<(), CoreError> {
        self.ensure_not_paused()?;

        let balance = self.balance_of(caller);
        if balance < amount {
            return Err(CoreError::InsufficientBalance {
                required: amount,
                available: balance,
            });
        }

        self.balances.insert(*caller, balance - amount);
        // Cannot underflow: the supply is the sum of balances and the
        // caller's balance covers the amount
        self.total_supply -= amount;

        debug!("Burned {} units of {} from {:?}", amount, self.symbol, caller);
        Ok(())
    }

    /// Burns `amount` units from `owner`, spending `spender`'s allowance.
    ///
    /// # Returns
    /// `InsufficientAllowance` when the approved limit does not cover
    /// `amount`, `InsufficientBalance` when the owner's balance does not,
    /// `ContractPaused` while paused.
    pub fn burn_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        self.ensure_not_paused()?;

        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(CoreError::InsufficientAllowance {
                required: amount,
                available: allowed,
            });
        }
        let balance = self.balance_of(owner);
        if balance < amount {
            return Err(CoreError::InsufficientBalance {
                required: amount,
                available: balance,
            });
        }

        self.allowances.insert((*owner, *spender), allowed - amount);
        self.balances.insert(*owner, balance - amount);
        self.total_supply -= amount;

        debug!(
            "Burned {} units of {} from {:?} via allowance",
            amount, self.symbol, owner
        );
        Ok(())
    }

    /// Transfers `amount` units from the caller to `to`.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        self.ensure_not_paused()?;

        let balance = self.balance_of(caller);
        if balance < amount {
            return Err(CoreError::InsufficientBalance {
                required: amount,
                available: balance,
            });
        }

        // Debit before crediting so a self-transfer nets out
        self.balances.insert(*caller, balance - amount);
        let recipient = self.balance_of(to);
        self.balances.insert(*to, recipient + amount);
        Ok(())
    }

    /// Transfers `amount` units from `owner` to `to`, spending
    /// `spender`'s allowance.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        self.ensure_not_paused()?;

        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(CoreError::InsufficientAllowance {
                required: amount,
                available: allowed,
            });
        }
        let balance = self.balance_of(owner);
        if balance < amount {
            return Err(CoreError::InsufficientBalance {
                required: amount,
                available: balance,
            });
        }

        self.allowances.insert((*owner, *spender), allowed - amount);
        self.balances.insert(*owner, balance - amount);
        let recipient = self.balance_of(to);
        self.balances.insert(*to, recipient + amount);
        Ok(())
    }

    /// Sets the allowance of `spender` over the caller's balance.
    ///
    /// Overwrite semantics: the new limit replaces any previous one.
    /// Not gated by the pause flag.
    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        self.allowances.insert((*caller, *spender), amount);
        Ok(())
    }

    /// Pauses the ledger; `caller` must hold the pauser role.
    ///
    /// Pausing an already paused ledger fails with `ContractPaused`.
    pub fn pause(&mut self, caller: &Address) -> Result<(), CoreError> {
        self.roles.require(Role::Pauser, caller)?;
        if self.paused {
            return Err(CoreError::ContractPaused);
        }
        self.paused = true;
        info!("{} ledger paused", self.symbol);
        Ok(())
    }

    /// Unpauses the ledger; `caller` must hold the pauser role.
    ///
    /// Unpausing a ledger that is not paused is a no-op success.
    pub fn unpause(&mut self, caller: &Address) -> Result<(), CoreError> {
        self.roles.require(Role::Pauser, caller)?;
        if self.paused {
            self.paused = false;
            info!("{} ledger unpaused", self.symbol);
        }
        Ok(())
    }

    /// Checks the structural invariants of the ledger.
    ///
    /// # Returns
    /// `InvariantViolation` if the sum of balances diverges from the
    /// total supply or the role table has lost its last admin.
    pub fn verify_invariants(&self) -> Result<(), CoreError> {
        let sum: Balance = self.balances.values().sum();
        if sum != self.total_supply {
            return Err(CoreError::InvariantViolation(format!(
                "balance sum {} does not match total supply {}",
                sum, self.total_supply
            )));
        }
        if self.roles.admin_count() == 0 {
            return Err(CoreError::InvariantViolation(
                "role table has no admin".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> Result<(), CoreError> {
        if self.paused {
            Err(CoreError::ContractPaused)
        } else {
            Ok(())
        }
    }
}
