//! Integration tests for the liquidity pool.

use millpond_core::{CoreError, LiquidityPool, PoolEvent, Role, TokenLedger, UNIT};
use rand::Rng;

/// Tests the posted-rate deposit: at rate 100, depositing 100 reserve
/// units mints 10,000 ledger units and records a Deposit event.
#[test]
fn test_deposit_at_posted_rate() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    let mut pool_address = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);
    rng.fill(&mut pool_address);

    let ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    let reserve = TokenLedger::new("USD Coin", "USDC", &admin);
    let mut pool = LiquidityPool::new(&pool_address, ledger, reserve, 100).unwrap();
    pool.ledger_mut()
        .grant_role(&admin, Role::Minter, &pool_address)
        .unwrap();

    // Fund the depositor and approve the pool
    pool.reserve_mut().mint(&admin, &user, 100 * UNIT).unwrap();
    pool.reserve_mut()
        .approve(&user, &pool_address, 100 * UNIT)
        .unwrap();

    let minted = pool
        .deposit_reserve(&user, 100 * UNIT, 1_700_000_000)
        .unwrap();

    assert_eq!(minted, 10_000 * UNIT);
    assert_eq!(pool.ledger().balance_of(&user), 10_000 * UNIT);
    assert_eq!(pool.ledger().total_supply(), 10_000 * UNIT);
    assert_eq!(pool.reserve().balance_of(&user), 0);
    assert_eq!(pool.reserve_custody(), 100 * UNIT);
    assert_eq!(
        pool.events(),
        &[PoolEvent::Deposit {
            user,
            amount: 100 * UNIT,
            timestamp: 1_700_000_000,
        }]
    );
    pool.verify_invariants().unwrap();
}

/// Tests that a deposit followed by a full withdrawal returns the exact
/// reserve amount when the rate divides evenly.
#[test]
fn test_round_trip_returns_deposit_when_rate_divides() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    let mut pool_address = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);
    rng.fill(&mut pool_address);

    let ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    let reserve = TokenLedger::new("USD Coin", "USDC", &admin);
    let mut pool = LiquidityPool::new(&pool_address, ledger, reserve, 100).unwrap();
    pool.ledger_mut()
        .grant_role(&admin, Role::Minter, &pool_address)
        .unwrap();
    pool.reserve_mut().mint(&admin, &user, 100 * UNIT).unwrap();
    pool.reserve_mut()
        .approve(&user, &pool_address, 100 * UNIT)
        .unwrap();

    let minted = pool.deposit_reserve(&user, 100 * UNIT, 1).unwrap();
    pool.ledger_mut()
        .approve(&user, &pool_address, minted)
        .unwrap();
    let paid = pool.withdraw(&user, minted, 2).unwrap();

    assert_eq!(paid, 100 * UNIT);
    assert_eq!(pool.reserve().balance_of(&user), 100 * UNIT);
    assert_eq!(pool.ledger().balance_of(&user), 0);
    assert_eq!(pool.ledger().total_supply(), 0);
    assert_eq!(pool.reserve_custody(), 0);
    assert_eq!(pool.events().len(), 2);
    pool.verify_invariants().unwrap();
}

/// Tests that withdrawal payouts round down and the loss is bounded by
/// the rate.
#[test]
fn test_withdraw_rounding_loss_is_bounded() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    let mut pool_address = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);
    rng.fill(&mut pool_address);

    let ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    let reserve = TokenLedger::new("USD Coin", "USDC", &admin);
    let mut pool = LiquidityPool::new(&pool_address, ledger, reserve, 100).unwrap();
    pool.ledger_mut()
        .grant_role(&admin, Role::Minter, &pool_address)
        .unwrap();
    pool.reserve_mut().mint(&admin, &user, UNIT).unwrap();
    pool.reserve_mut()
        .approve(&user, &pool_address, UNIT)
        .unwrap();
    pool.deposit_reserve(&user, UNIT, 1).unwrap();
    pool.ledger_mut()
        .approve(&user, &pool_address, 100 * UNIT)
        .unwrap();

    // Below the rate the whole burn is forfeited
    let paid = pool.withdraw(&user, 99, 2).unwrap();
    assert_eq!(paid, 0);
    assert_eq!(pool.reserve().balance_of(&user), 0);
    assert_eq!(pool.ledger().balance_of(&user), 100 * UNIT - 99);

    // Above it the remainder is forfeited, less than one reserve unit
    let paid = pool.withdraw(&user, 150, 3).unwrap();
    assert_eq!(paid, 1);
    assert_eq!(pool.reserve().balance_of(&user), 1);
    assert_eq!(pool.ledger().balance_of(&user), 100 * UNIT - 99 - 150);
    assert_eq!(pool.reserve_custody(), UNIT - 1);
    pool.verify_invariants().unwrap();
}

/// Tests that redeeming more than the held balance fails without
/// touching the ledger, even with ample reserve in custody.
#[test]
fn test_over_redemption_leaves_ledger_balance() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    let mut whale = [0u8; 32];
    let mut pool_address = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);
    rng.fill(&mut whale);
    rng.fill(&mut pool_address);

    let ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    let reserve = TokenLedger::new("USD Coin", "USDC", &admin);
    let mut pool = LiquidityPool::new(&pool_address, ledger, reserve, 100).unwrap();
    pool.ledger_mut()
        .grant_role(&admin, Role::Minter, &pool_address)
        .unwrap();

    // A large co-depositor keeps custody well above the user's share
    pool.reserve_mut()
        .mint(&admin, &whale, 900 * UNIT)
        .unwrap();
    pool.reserve_mut()
        .approve(&whale, &pool_address, 900 * UNIT)
        .unwrap();
    pool.deposit_reserve(&whale, 900 * UNIT, 1).unwrap();

    pool.reserve_mut().mint(&admin, &user, 100 * UNIT).unwrap();
    pool.reserve_mut()
        .approve(&user, &pool_address, 100 * UNIT)
        .unwrap();
    pool.deposit_reserve(&user, 100 * UNIT, 2).unwrap();
    assert_eq!(pool.ledger().balance_of(&user), 10_000 * UNIT);

    pool.ledger_mut()
        .approve(&user, &pool_address, 20_000 * UNIT)
        .unwrap();
    let result = pool.withdraw(&user, 10_001 * UNIT, 3);
    assert!(matches!(
        result,
        Err(CoreError::InsufficientBalance { required, available })
            if required == 10_001 * UNIT && available == 10_000 * UNIT
    ));

    assert_eq!(pool.ledger().balance_of(&user), 10_000 * UNIT);
    assert_eq!(pool.reserve_custody(), 1_000 * UNIT);
    assert_eq!(pool.events().len(), 2);
    pool.verify_invariants().unwrap();
}

/// Tests that only an admin can move the exchange rate.
#[test]
fn test_rate_update_requires_admin() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    let mut pool_address = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);
    rng.fill(&mut pool_address);

    let ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    let reserve = TokenLedger::new("USD Coin", "USDC", &admin);
    let mut pool = LiquidityPool::new(&pool_address, ledger, reserve, 100).unwrap();

    assert!(matches!(
        pool.update_exchange_rate(&user, 200),
        Err(CoreError::PermissionDenied(Role::Admin))
    ));
    assert_eq!(pool.exchange_rate(), 100);

    pool.update_exchange_rate(&admin, 200).unwrap();
    assert_eq!(pool.exchange_rate(), 200);
}

/// Tests that a rate change touches no existing balance and only
/// applies to conversions after the change.
#[test]
fn test_rate_update_is_not_retroactive() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    let mut pool_address = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);
    rng.fill(&mut pool_address);

    let ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    let reserve = TokenLedger::new("USD Coin", "USDC", &admin);
    let mut pool = LiquidityPool::new(&pool_address, ledger, reserve, 100).unwrap();
    pool.ledger_mut()
        .grant_role(&admin, Role::Minter, &pool_address)
        .unwrap();
    pool.reserve_mut().mint(&admin, &user, 110 * UNIT).unwrap();
    pool.reserve_mut()
        .approve(&user, &pool_address, 110 * UNIT)
        .unwrap();

    pool.deposit_reserve(&user, 100 * UNIT, 1).unwrap();
    assert_eq!(pool.ledger().balance_of(&user), 10_000 * UNIT);

    // Balances minted at the old rate are left alone
    pool.update_exchange_rate(&admin, 50).unwrap();
    assert_eq!(pool.ledger().balance_of(&user), 10_000 * UNIT);

    // Later conversions use the new rate
    let minted = pool.deposit_reserve(&user, 10 * UNIT, 2).unwrap();
    assert_eq!(minted, 500 * UNIT);

    pool.ledger_mut()
        .approve(&user, &pool_address, 500 * UNIT)
        .unwrap();
    let paid = pool.withdraw(&user, 500 * UNIT, 3).unwrap();
    assert_eq!(paid, 10 * UNIT);
    pool.verify_invariants().unwrap();
}

/// Tests that sweeping custody below the outstanding backing makes a
/// later withdrawal fail even though the ledger balance covers it.
#[test]
fn test_sweep_below_backing_blocks_withdrawals() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    let mut treasury = [0u8; 32];
    let mut pool_address = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);
    rng.fill(&mut treasury);
    rng.fill(&mut pool_address);

    let ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    let reserve = TokenLedger::new("USD Coin", "USDC", &admin);
    let mut pool = LiquidityPool::new(&pool_address, ledger, reserve, 100).unwrap();
    pool.ledger_mut()
        .grant_role(&admin, Role::Minter, &pool_address)
        .unwrap();
    pool.reserve_mut().mint(&admin, &user, 100 * UNIT).unwrap();
    pool.reserve_mut()
        .approve(&user, &pool_address, 100 * UNIT)
        .unwrap();
    pool.deposit_reserve(&user, 100 * UNIT, 1).unwrap();

    pool.withdraw_reserve(&admin, &treasury, 95 * UNIT).unwrap();
    assert_eq!(pool.reserve().balance_of(&treasury), 95 * UNIT);
    assert_eq!(pool.reserve_custody(), 5 * UNIT);

    pool.ledger_mut()
        .approve(&user, &pool_address, 10_000 * UNIT)
        .unwrap();
    let result = pool.withdraw(&user, 10_000 * UNIT, 2);
    assert!(matches!(
        result,
        Err(CoreError::InsufficientReserve { required, available })
            if required == 100 * UNIT && available == 5 * UNIT
    ));

    // The burn never happened and no Withdraw event was recorded
    assert_eq!(pool.ledger().balance_of(&user), 10_000 * UNIT);
    assert_eq!(pool.events().len(), 1);
    pool.verify_invariants().unwrap();
}

/// Tests that a deposit rolls back the reserve pull and the spent
/// allowance when minting is blocked by a paused ledger.
#[test]
fn test_deposit_refunds_reserve_when_mint_blocked() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    let mut pool_address = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);
    rng.fill(&mut pool_address);

    let ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    let reserve = TokenLedger::new("USD Coin", "USDC", &admin);
    let mut pool = LiquidityPool::new(&pool_address, ledger, reserve, 100).unwrap();
    pool.ledger_mut()
        .grant_role(&admin, Role::Minter, &pool_address)
        .unwrap();
    pool.reserve_mut().mint(&admin, &user, 100 * UNIT).unwrap();
    pool.reserve_mut()
        .approve(&user, &pool_address, 100 * UNIT)
        .unwrap();

    pool.ledger_mut().pause(&admin).unwrap();
    let result = pool.deposit_reserve(&user, 100 * UNIT, 1);
    assert!(matches!(result, Err(CoreError::ContractPaused)));

    // The pulled reserve went back to the depositor and the standing
    // approval survived the failed attempt
    assert_eq!(pool.reserve().balance_of(&user), 100 * UNIT);
    assert_eq!(pool.reserve().allowance(&user, &pool_address), 100 * UNIT);
    assert_eq!(pool.reserve_custody(), 0);
    assert_eq!(pool.ledger().total_supply(), 0);
    assert!(pool.events().is_empty());

    // The retry runs under that same approval
    pool.ledger_mut().unpause(&admin).unwrap();
    pool.deposit_reserve(&user, 100 * UNIT, 2).unwrap();
    assert_eq!(pool.ledger().balance_of(&user), 10_000 * UNIT);
    pool.verify_invariants().unwrap();
}

/// Tests that the event log replays the pool's history in call order.
#[test]
fn test_event_log_replays_in_call_order() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    let mut pool_address = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);
    rng.fill(&mut pool_address);

    let ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    let reserve = TokenLedger::new("USD Coin", "USDC", &admin);
    let mut pool = LiquidityPool::new(&pool_address, ledger, reserve, 100).unwrap();
    pool.ledger_mut()
        .grant_role(&admin, Role::Minter, &pool_address)
        .unwrap();
    pool.reserve_mut().mint(&admin, &user, 15 * UNIT).unwrap();
    pool.reserve_mut()
        .approve(&user, &pool_address, 15 * UNIT)
        .unwrap();

    pool.deposit_reserve(&user, 10 * UNIT, 10).unwrap();
    pool.ledger_mut()
        .approve(&user, &pool_address, 500 * UNIT)
        .unwrap();
    pool.withdraw(&user, 500 * UNIT, 20).unwrap();
    pool.deposit_reserve(&user, 5 * UNIT, 30).unwrap();

    assert_eq!(
        pool.events(),
        &[
            PoolEvent::Deposit {
                user,
                amount: 10 * UNIT,
                timestamp: 10,
            },
            PoolEvent::Withdraw {
                user,
                amount: 5 * UNIT,
                timestamp: 20,
            },
            PoolEvent::Deposit {
                user,
                amount: 5 * UNIT,
                timestamp: 30,
            },
        ]
    );
    pool.verify_invariants().unwrap();
}
