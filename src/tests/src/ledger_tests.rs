//! Integration tests for the token ledger.

use millpond_core::{CoreError, Role, TokenLedger, UNIT};
use rand::Rng;

/// Tests that total supply tracks the sum of balances across a full
/// lifecycle of mints, transfers, delegated spends and burns.
#[test]
fn test_lifecycle_preserves_supply() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut alice = [0u8; 32];
    let mut bob = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut alice);
    rng.fill(&mut bob);

    let mut ledger = TokenLedger::new("Millpond Token", "MILL", &admin);

    // Mint starting balances
    ledger.mint(&admin, &alice, 100 * UNIT).unwrap();
    ledger.mint(&admin, &bob, 50 * UNIT).unwrap();
    ledger.verify_invariants().unwrap();
    assert_eq!(ledger.total_supply(), 150 * UNIT);

    // Move tokens around
    ledger.transfer(&alice, &bob, 30 * UNIT).unwrap();
    ledger.verify_invariants().unwrap();
    assert_eq!(ledger.balance_of(&alice), 70 * UNIT);
    assert_eq!(ledger.balance_of(&bob), 80 * UNIT);
    assert_eq!(ledger.total_supply(), 150 * UNIT);

    // Delegated spending consumes the allowance
    ledger.approve(&bob, &alice, 10 * UNIT).unwrap();
    ledger
        .transfer_from(&alice, &bob, &alice, 10 * UNIT)
        .unwrap();
    ledger.verify_invariants().unwrap();
    assert_eq!(ledger.allowance(&bob, &alice), 0);
    assert_eq!(ledger.balance_of(&alice), 80 * UNIT);
    assert_eq!(ledger.balance_of(&bob), 70 * UNIT);
    assert_eq!(ledger.total_supply(), 150 * UNIT);

    // Burning shrinks supply
    ledger.burn(&alice, 20 * UNIT).unwrap();
    ledger.verify_invariants().unwrap();
    assert_eq!(ledger.balance_of(&alice), 60 * UNIT);
    assert_eq!(ledger.total_supply(), 130 * UNIT);

    ledger.approve(&bob, &alice, 5 * UNIT).unwrap();
    ledger.burn_from(&alice, &bob, 5 * UNIT).unwrap();
    ledger.verify_invariants().unwrap();
    assert_eq!(ledger.balance_of(&bob), 65 * UNIT);
    assert_eq!(ledger.total_supply(), 125 * UNIT);
}

/// Tests that each role gates only its own operations.
#[test]
fn test_role_separation() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut minter = [0u8; 32];
    let mut pauser = [0u8; 32];
    let mut outsider = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut minter);
    rng.fill(&mut pauser);
    rng.fill(&mut outsider);

    let mut ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    ledger.grant_role(&admin, Role::Minter, &minter).unwrap();
    ledger.grant_role(&admin, Role::Pauser, &pauser).unwrap();

    // The minter can mint but not pause
    ledger.mint(&minter, &outsider, UNIT).unwrap();
    assert!(matches!(
        ledger.pause(&minter),
        Err(CoreError::PermissionDenied(Role::Pauser))
    ));
    assert!(!ledger.is_paused());

    // The pauser can pause but not mint
    assert!(matches!(
        ledger.mint(&pauser, &outsider, UNIT),
        Err(CoreError::PermissionDenied(Role::Minter))
    ));
    assert_eq!(ledger.balance_of(&outsider), UNIT);
    assert_eq!(ledger.total_supply(), UNIT);
    ledger.pause(&pauser).unwrap();
    assert!(ledger.is_paused());
    ledger.unpause(&pauser).unwrap();

    // Only the admin can manage roles
    assert!(matches!(
        ledger.grant_role(&minter, Role::Minter, &outsider),
        Err(CoreError::PermissionDenied(Role::Admin))
    ));
    assert!(!ledger.has_role(Role::Minter, &outsider));
    ledger.verify_invariants().unwrap();
}

/// Tests that the admin set can never be emptied.
#[test]
fn test_last_admin_cannot_be_removed() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut second = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut second);

    let mut ledger = TokenLedger::new("Millpond Token", "MILL", &admin);

    // A lone admin cannot remove itself
    assert!(matches!(
        ledger.revoke_role(&admin, Role::Admin, &admin),
        Err(CoreError::InvariantViolation(_))
    ));
    assert!(ledger.has_role(Role::Admin, &admin));

    // With a second admin the first can step down
    ledger.grant_role(&admin, Role::Admin, &second).unwrap();
    ledger.revoke_role(&admin, Role::Admin, &admin).unwrap();
    assert!(!ledger.has_role(Role::Admin, &admin));

    // The survivor is now protected
    assert!(matches!(
        ledger.revoke_role(&second, Role::Admin, &second),
        Err(CoreError::InvariantViolation(_))
    ));
    assert!(ledger.has_role(Role::Admin, &second));
}

/// Tests that burning more than the held balance fails and leaves the
/// balance untouched.
#[test]
fn test_over_burn_fails_leaving_balance() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut alice = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut alice);

    let mut ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    ledger.mint(&admin, &alice, 1_000 * UNIT).unwrap();

    let result = ledger.burn(&alice, 2_000 * UNIT);
    assert!(matches!(
        result,
        Err(CoreError::InsufficientBalance { required, available })
            if required == 2_000 * UNIT && available == 1_000 * UNIT
    ));
    assert_eq!(ledger.balance_of(&alice), 1_000 * UNIT);
    assert_eq!(ledger.total_supply(), 1_000 * UNIT);
    ledger.verify_invariants().unwrap();
}

/// Tests that pause blocks movement while approvals stay live.
#[test]
fn test_pause_gates_movement_not_approvals() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut alice = [0u8; 32];
    let mut bob = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut alice);
    rng.fill(&mut bob);

    let mut ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    ledger.mint(&admin, &alice, 10 * UNIT).unwrap();
    ledger.pause(&admin).unwrap();

    // Movement is frozen
    assert!(matches!(
        ledger.transfer(&alice, &bob, UNIT),
        Err(CoreError::ContractPaused)
    ));
    assert!(matches!(
        ledger.mint(&admin, &bob, UNIT),
        Err(CoreError::ContractPaused)
    ));
    assert!(matches!(
        ledger.burn(&alice, UNIT),
        Err(CoreError::ContractPaused)
    ));

    // Approvals are bookkeeping, not movement
    ledger.approve(&alice, &bob, 5 * UNIT).unwrap();
    assert_eq!(ledger.allowance(&alice, &bob), 5 * UNIT);
    assert!(matches!(
        ledger.transfer_from(&bob, &alice, &bob, UNIT),
        Err(CoreError::ContractPaused)
    ));

    // Pausing a paused ledger reports the pause
    assert!(matches!(ledger.pause(&admin), Err(CoreError::ContractPaused)));

    // Unpausing restores movement and is idempotent
    ledger.unpause(&admin).unwrap();
    ledger.unpause(&admin).unwrap();
    ledger.transfer_from(&bob, &alice, &bob, UNIT).unwrap();
    assert_eq!(ledger.balance_of(&bob), UNIT);
    ledger.verify_invariants().unwrap();
}

/// Tests that rejected operations change nothing.
#[test]
fn test_failed_operations_leave_no_trace() {
    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut alice = [0u8; 32];
    let mut bob = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut alice);
    rng.fill(&mut bob);

    let mut ledger = TokenLedger::new("Millpond Token", "MILL", &admin);
    ledger.mint(&admin, &alice, 10 * UNIT).unwrap();
    ledger.approve(&alice, &bob, 2 * UNIT).unwrap();

    // Overdrawn transfer
    assert!(matches!(
        ledger.transfer(&alice, &bob, 11 * UNIT),
        Err(CoreError::InsufficientBalance { .. })
    ));

    // Spend above the allowance
    assert!(matches!(
        ledger.transfer_from(&bob, &alice, &bob, 3 * UNIT),
        Err(CoreError::InsufficientAllowance { .. })
    ));

    // Unauthorized and zero mints
    assert!(matches!(
        ledger.mint(&bob, &bob, UNIT),
        Err(CoreError::PermissionDenied(Role::Minter))
    ));
    assert!(matches!(
        ledger.mint(&admin, &bob, 0),
        Err(CoreError::InvalidAmount(0))
    ));

    // Nothing moved
    assert_eq!(ledger.balance_of(&alice), 10 * UNIT);
    assert_eq!(ledger.balance_of(&bob), 0);
    assert_eq!(ledger.allowance(&alice, &bob), 2 * UNIT);
    assert_eq!(ledger.total_supply(), 10 * UNIT);
    ledger.verify_invariants().unwrap();
}
