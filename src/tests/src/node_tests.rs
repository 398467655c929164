//! Integration tests for the node and the CLI plumbing.

use millpond_core::{parse_amount, UNIT};
use millpond_node::config::NodeConfig;
use millpond_node::genesis;
use millpond_node::rpc::start_rpc_server;
use millpond_node::store::StateStore;
use rand::Rng;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tokio::runtime::Runtime;

/// Tests that a node restart resumes from the last snapshot.
#[test]
fn test_snapshot_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state");

    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    let mut user = [0u8; 32];
    rng.fill(&mut admin);
    rng.fill(&mut user);

    let mut config = NodeConfig::default();
    config.genesis.admin_address = hex::encode(admin);

    // First run: build genesis, fund a depositor, deposit, snapshot
    {
        let store = StateStore::open(&path).unwrap();
        let mut pool = genesis::build(&config).unwrap();
        let pool_address = pool.address();
        pool.reserve_mut().mint(&admin, &user, 100 * UNIT).unwrap();
        pool.reserve_mut()
            .approve(&user, &pool_address, 100 * UNIT)
            .unwrap();
        pool.deposit_reserve(&user, 100 * UNIT, 1).unwrap();
        store.save(&pool).unwrap();
    }

    // Second run: load the snapshot and keep operating
    {
        let store = StateStore::open(&path).unwrap();
        let mut pool = store.load().unwrap().unwrap();
        assert_eq!(pool.ledger().balance_of(&user), 10_000 * UNIT);
        assert_eq!(pool.reserve_custody(), 100 * UNIT);
        assert_eq!(pool.events().len(), 1);

        let pool_address = pool.address();
        pool.ledger_mut()
            .approve(&user, &pool_address, 10_000 * UNIT)
            .unwrap();
        let paid = pool.withdraw(&user, 10_000 * UNIT, 2).unwrap();
        assert_eq!(paid, 100 * UNIT);
        pool.verify_invariants().unwrap();
        store.save(&pool).unwrap();
    }

    // The second snapshot replaced the first
    let store = StateStore::open(&path).unwrap();
    let pool = store.load().unwrap().unwrap();
    assert_eq!(pool.ledger().total_supply(), 0);
    assert_eq!(pool.reserve().balance_of(&user), 100 * UNIT);
    assert_eq!(pool.events().len(), 2);
}

/// Tests that the node's RPC server starts.
#[test]
fn test_rpc_server_starts() {
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();

    let mut rng = rand::thread_rng();
    let mut admin = [0u8; 32];
    rng.fill(&mut admin);

    let mut config = NodeConfig::default();
    config.genesis.admin_address = hex::encode(admin);
    let pool = genesis::build(&config).unwrap();
    let store = StateStore::open(dir.path().join("state")).unwrap();
    let pool = Arc::new(Mutex::new(pool));

    rt.block_on(async {
        let rpc_addr = "127.0.0.1:0".parse().unwrap();
        let result = start_rpc_server(rpc_addr, pool.clone(), store.clone()).await;
        assert!(result.is_ok());
    });
}

/// Tests that the CLI derives the same custody address the node uses.
#[test]
fn test_cli_label_resolves_to_pool_address() {
    let resolved = millpond_cli::resolve_address("millpond-pool").unwrap();
    assert_eq!(resolved, genesis::pool_address());

    // Hex output from the CLI resolves back to the same address
    let formatted = millpond_cli::format_address(&genesis::pool_address());
    assert_eq!(
        millpond_cli::resolve_address(&formatted).unwrap(),
        genesis::pool_address()
    );
}

/// Tests that CLI decimal amounts land on the ledger's base units.
#[test]
fn test_cli_amounts_match_ledger_units() {
    assert_eq!(millpond_cli::parse_human_amount("100").unwrap(), 100 * UNIT);
    assert_eq!(millpond_cli::parse_human_amount("0.5").unwrap(), UNIT / 2);
    assert_eq!(parse_amount("2.5"), Some(2 * UNIT + UNIT / 2));
}
