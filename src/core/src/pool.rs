//! The liquidity pool.
//!
//! The pool custodies a reserve asset and converts it to and from
//! ledger tokens at an admin-set integer exchange rate: a deposit pulls
//! reserve units into custody and mints `amount * rate` ledger units to
//! the depositor; a withdrawal burns ledger units and pays out
//! `amount / rate` reserve units, rounded down in the pool's favor.
//!
//! Privileged pool operations consult the ledger token's role table,
//! so one grant surface governs both components. The reserve asset is
//! an independent ledger the pool drives only through balance,
//! allowance, and transfer calls.

use crate::access::Role;
use crate::errors::CoreError;
use crate::ledger::TokenLedger;
use crate::types::{Address, Balance};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// An entry in the pool's append-only event log.
///
/// Events are appended in call order; external consumers reconstruct
/// deposit and withdrawal history by replaying the log. Amounts are
/// reserve units; timestamps are unix seconds supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    /// Reserve units entered custody and ledger tokens were minted.
    Deposit {
        /// The depositing address
        user: Address,
        /// The reserve amount deposited
        amount: Balance,
        /// Unix seconds at the time of the call
        timestamp: u64,
    },
    /// Ledger tokens were burned and reserve units paid out.
    Withdraw {
        /// The withdrawing address
        user: Address,
        /// The reserve amount paid out
        amount: Balance,
        /// Unix seconds at the time of the call
        timestamp: u64,
    },
}

/// A pool custodying a reserve asset against minted ledger tokens.
///
/// The pool owns both ledgers; every balance and allowance access goes
/// through their operations, and the custody balance is simply the
/// reserve ledger's balance at the pool's own address. The pool address
/// must be granted the minter role on the ledger token before deposits
/// can succeed; that grant is part of system bring-up, not of
/// construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiquidityPool {
    /// The pool's own address, under which custody is recorded
    address: Address,
    /// The issued token; its role table also gates pool administration
    ledger: TokenLedger,
    /// The external reserve asset
    reserve: TokenLedger,
    /// Ledger units minted per one reserve unit
    exchange_rate: Balance,
    /// Append-only deposit and withdrawal log
    events: Vec<PoolEvent>,
    /// Reentrancy latch, set for the duration of one mutating call
    #[serde(skip)]
    entered: bool,
}

impl LiquidityPool {
    /// Creates a pool over the given ledgers.
    ///
    /// # Arguments
    /// * `address` - The pool's custody address
    /// * `ledger` - The issued token the pool mints and burns
    /// * `reserve` - The reserve asset the pool custodies
    /// * `exchange_rate` - Ledger units per reserve unit, must be positive
    pub fn new(
        address: &Address,
        ledger: TokenLedger,
        reserve: TokenLedger,
        exchange_rate: Balance,
    ) -> Result<Self, CoreError> {
        if exchange_rate == 0 {
            return Err(CoreError::InvalidAmount(0));
        }
        Ok(Self {
            address: *address,
            ledger,
            reserve,
            exchange_rate,
            events: Vec::new(),
            entered: false,
        })
    }

    /// Returns the pool's custody address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the current exchange rate.
    pub fn exchange_rate(&self) -> Balance {
        self.exchange_rate
    }

    /// Returns the reserve amount currently held in custody.
    pub fn reserve_custody(&self) -> Balance {
        self.reserve.balance_of(&self.address)
    }

    /// Returns the event log, oldest first.
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Returns the issued token ledger.
    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    /// Returns the issued token ledger mutably, for direct token
    /// operations.
    pub fn ledger_mut(&mut self) -> &mut TokenLedger {
        &mut self.ledger
    }

    /// Returns the reserve asset ledger.
    pub fn reserve(&self) -> &TokenLedger {
        &self.reserve
    }

    /// Returns the reserve asset ledger mutably, for direct reserve
    /// operations.
    pub fn reserve_mut(&mut self) -> &mut TokenLedger {
        &mut self.reserve
    }

    /// Deposits `amount` reserve units and mints `amount * rate` ledger
    /// units to the caller.
    ///
    /// The caller must have approved the pool for at least `amount` on
    /// the reserve asset. The pull and the mint are one atomic unit: if
    /// the mint fails, the pulled reserve and the allowance it spent
    /// are restored before the error surfaces. Emits a `Deposit` event
    /// and returns the minted ledger amount.
    pub fn deposit_reserve(
        &mut self,
        caller: &Address,
        amount: Balance,
        timestamp: u64,
    ) -> Result<Balance, CoreError> {
        if self.entered {
            return Err(CoreError::ReentrancyBlocked);
        }
        self.entered = true;
        let result = self.deposit_inner(caller, amount, timestamp);
        self.entered = false;
        result
    }

    fn deposit_inner(
        &mut self,
        caller: &Address,
        amount: Balance,
        timestamp: u64,
    ) -> Result<Balance, CoreError> {
        if amount == 0 {
            return Err(CoreError::InvalidAmount(0));
        }
        let mint_amount = amount
            .checked_mul(self.exchange_rate)
            .ok_or(CoreError::InvalidAmount(amount))?;

        // Pull the reserve into custody, then mint against it. The pull
        // spends the caller's allowance, so it is snapshotted for the
        // rollback path.
        let pool = self.address;
        let prior_allowance = self.reserve.allowance(caller, &pool);
        self.reserve.transfer_from(&pool, caller, &pool, amount)?;

        if let Err(mint_err) = self.ledger.mint(&pool, caller, mint_amount) {
            // Put back the pulled reserve and the spent allowance before
            // surfacing the error so no trace of the deposit persists
            warn!(
                "Mint of {} ledger units failed ({}), refunding {} reserve units",
                mint_amount, mint_err, amount
            );
            self.reserve.transfer(&pool, caller, amount).map_err(|refund_err| {
                CoreError::InvariantViolation(format!(
                    "deposit rollback failed: {}",
                    refund_err
                ))
            })?;
            self.reserve.approve(caller, &pool, prior_allowance)?;
            return Err(mint_err);
        }

        self.events.push(PoolEvent::Deposit {
            user: *caller,
            amount,
            timestamp,
        });
        debug!(
            "Deposit of {} reserve units minted {} ledger units",
            amount, mint_amount
        );
        Ok(mint_amount)
    }

    /// Burns `ledger_amount` from the caller and pays out
    /// `ledger_amount / rate` reserve units from custody.
    ///
    /// Integer division rounds down; the sub-rate remainder is burned
    /// without payout. The burn is allowance-gated: the caller must
    /// have approved the pool on the ledger token. Emits a `Withdraw`
    /// event and returns the reserve amount paid out.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        ledger_amount: Balance,
        timestamp: u64,
    ) -> Result<Balance, CoreError> {
        if self.entered {
            return Err(CoreError::ReentrancyBlocked);
        }
        self.entered = true;
        let result = self.withdraw_inner(caller, ledger_amount, timestamp);
        self.entered = false;
        result
    }

    fn withdraw_inner(
        &mut self,
        caller: &Address,
        ledger_amount: Balance,
        timestamp: u64,
    ) -> Result<Balance, CoreError> {
        if ledger_amount == 0 {
            return Err(CoreError::InvalidAmount(0));
        }
        let reserve_amount = ledger_amount / self.exchange_rate;

        // The payout must not be able to fail once the burn has gone
        // through, so the reserve side is checked first
        if self.reserve.is_paused() {
            return Err(CoreError::ContractPaused);
        }
        let custody = self.reserve_custody();
        if custody < reserve_amount {
            return Err(CoreError::InsufficientReserve {
                required: reserve_amount,
                available: custody,
            });
        }

        let pool = self.address;
        self.ledger.burn_from(&pool, caller, ledger_amount)?;

        if reserve_amount > 0 {
            self.reserve
                .transfer(&pool, caller, reserve_amount)
                .map_err(|payout_err| {
                    CoreError::InvariantViolation(format!(
                        "withdraw payout failed after burn: {}",
                        payout_err
                    ))
                })?;
        }

        self.events.push(PoolEvent::Withdraw {
            user: *caller,
            amount: reserve_amount,
            timestamp,
        });
        debug!(
            "Withdrawal burned {} ledger units for {} reserve units",
            ledger_amount, reserve_amount
        );
        Ok(reserve_amount)
    }

    /// Replaces the exchange rate; `caller` must hold admin.
    ///
    /// Takes effect only for subsequent deposits and withdrawals.
    /// Tokens already outstanding are not repriced, so a rate decrease
    /// can leave custody short of the amount implied by supply.
    pub fn update_exchange_rate(
        &mut self,
        caller: &Address,
        new_rate: Balance,
    ) -> Result<(), CoreError> {
        self.ledger.roles().require(Role::Admin, caller)?;
        if new_rate == 0 {
            return Err(CoreError::InvalidAmount(0));
        }
        let old_rate = self.exchange_rate;
        self.exchange_rate = new_rate;
        info!("Exchange rate updated from {} to {}", old_rate, new_rate);
        Ok(())
    }

    /// Sweeps `amount` reserve units from custody to `recipient`;
    /// `caller` must hold admin.
    ///
    /// Independent of any burn, so it can reduce custody below the
    /// amount implied by outstanding supply. Left out of the event log:
    /// replayed history covers deposits and withdrawals only.
    pub fn withdraw_reserve(
        &mut self,
        caller: &Address,
        recipient: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        if self.entered {
            return Err(CoreError::ReentrancyBlocked);
        }
        self.entered = true;
        let result = self.withdraw_reserve_inner(caller, recipient, amount);
        self.entered = false;
        result
    }

    fn withdraw_reserve_inner(
        &mut self,
        caller: &Address,
        recipient: &Address,
        amount: Balance,
    ) -> Result<(), CoreError> {
        self.ledger.roles().require(Role::Admin, caller)?;
        if amount == 0 {
            return Err(CoreError::InvalidAmount(0));
        }
        let custody = self.reserve_custody();
        if custody < amount {
            return Err(CoreError::InsufficientReserve {
                required: amount,
                available: custody,
            });
        }

        let pool = self.address;
        self.reserve.transfer(&pool, recipient, amount)?;
        warn!(
            "Admin swept {} reserve units from custody, {} remaining against supply {}",
            amount,
            self.reserve_custody(),
            self.ledger.total_supply()
        );
        Ok(())
    }

    /// Checks the structural invariants of the pool and both ledgers.
    pub fn verify_invariants(&self) -> Result<(), CoreError> {
        self.ledger.verify_invariants()?;
        self.reserve.verify_invariants()?;
        if self.exchange_rate == 0 {
            return Err(CoreError::InvariantViolation(
                "exchange rate is zero".to_string(),
            ));
        }
        Ok(())
    }
}
