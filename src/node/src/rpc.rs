//! JSON-RPC server for the node daemon.
//!
//! All state-changing methods take the caller address as their first
//! parameter; the server trusts the transport to have authenticated it.
//! Amounts travel as decimal strings of base units, because JSON
//! numbers cannot carry a full u128.

use crate::metrics;
use crate::store::StateStore;
use anyhow::Result;
use millpond_core::{Address, Balance, CoreError, LiquidityPool, PoolEvent, Role};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use warp::{Filter, Rejection, Reply};

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC version
    #[allow(dead_code)]
    jsonrpc: String,
    /// Method to call
    method: String,
    /// Parameters for the method
    params: serde_json::Value,
    /// Request ID
    id: serde_json::Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC version
    jsonrpc: String,
    /// Result of the method call
    result: Option<serde_json::Value>,
    /// Error, if any
    error: Option<JsonRpcError>,
    /// Request ID
    id: serde_json::Value,
}

/// JSON-RPC error.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code
    code: i32,
    /// Error message
    message: String,
    /// Additional error data
    data: Option<serde_json::Value>,
}

/// State for the RPC server.
struct RpcState {
    /// The pool and both ledgers, behind the node's single lock
    pool: Arc<Mutex<LiquidityPool>>,
    /// The on-disk snapshot store
    store: StateStore,
}

/// Starts the JSON-RPC server.
pub async fn start_rpc_server(
    addr: SocketAddr,
    pool: Arc<Mutex<LiquidityPool>>,
    store: StateStore,
) -> Result<()> {
    let state = Arc::new(RpcState { pool, store });

    let rpc_route = warp::path("rpc")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_rpc);

    tokio::spawn(async move {
        warp::serve(rpc_route).run(addr).await;
    });

    Ok(())
}

/// Provides the RPC state to handlers.
fn with_state(
    state: Arc<RpcState>,
) -> impl Filter<Extract = (Arc<RpcState>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Handles a JSON-RPC request.
async fn handle_rpc(
    request: JsonRpcRequest,
    state: Arc<RpcState>,
) -> Result<impl Reply, Rejection> {
    let id = request.id.clone();
    metrics::RPC_REQUEST_COUNTER.inc();
    let _timer = metrics::RPC_REQUEST_DURATION.start_timer();
    debug!("RPC request: {}", request.method);

    let result = match request.method.as_str() {
        "getBalance" => handle_get_balance(&request.params, &state),
        "getTotalSupply" => handle_get_total_supply(&state),
        "getAllowance" => handle_get_allowance(&request.params, &state),
        "transfer" => handle_transfer(&request.params, &state),
        "transferFrom" => handle_transfer_from(&request.params, &state),
        "approve" => handle_approve(&request.params, &state),
        "mint" => handle_mint(&request.params, &state),
        "burn" => handle_burn(&request.params, &state),
        "pause" => handle_pause(&request.params, &state),
        "unpause" => handle_unpause(&request.params, &state),
        "grantRole" => handle_grant_role(&request.params, &state),
        "revokeRole" => handle_revoke_role(&request.params, &state),
        "hasRole" => handle_has_role(&request.params, &state),
        "getReserveBalance" => handle_get_reserve_balance(&request.params, &state),
        "approveReserve" => handle_approve_reserve(&request.params, &state),
        "mintReserve" => handle_mint_reserve(&request.params, &state),
        "deposit" => handle_deposit(&request.params, &state),
        "withdraw" => handle_withdraw(&request.params, &state),
        "getExchangeRate" => handle_get_exchange_rate(&state),
        "updateExchangeRate" => handle_update_exchange_rate(&request.params, &state),
        "withdrawReserve" => handle_withdraw_reserve(&request.params, &state),
        "getPoolInfo" => handle_get_pool_info(&state),
        "getPoolHistory" => handle_get_pool_history(&state),
        _ => Err(JsonRpcError {
            code: -32601,
            message: "Method not found".to_string(),
            data: None,
        }),
    };

    let response = match result {
        Ok(result) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        },
        Err(error) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        },
    };

    Ok(warp::reply::json(&response))
}

/// Builds a -32602 invalid params error.
fn invalid_params(message: &str) -> JsonRpcError {
    JsonRpcError {
        code: -32602,
        message: message.to_string(),
        data: None,
    }
}

/// Maps a core error onto the application error code.
fn core_error(error: CoreError) -> JsonRpcError {
    JsonRpcError {
        code: -32000,
        message: error.to_string(),
        data: None,
    }
}

/// Checks that `params` is an array of exactly `count` elements.
fn expect_params(
    params: &serde_json::Value,
    count: usize,
) -> Result<&Vec<serde_json::Value>, JsonRpcError> {
    let params = params
        .as_array()
        .ok_or_else(|| invalid_params("Invalid params"))?;
    if params.len() != count {
        return Err(invalid_params(&format!(
            "Expected {} parameters, got {}",
            count,
            params.len()
        )));
    }
    Ok(params)
}

/// Parses a 32-byte hex address parameter.
fn parse_address(value: &serde_json::Value) -> Result<Address, JsonRpcError> {
    let address_hex = value
        .as_str()
        .ok_or_else(|| invalid_params("Invalid address"))?;

    let address_bytes = hex::decode(address_hex.trim_start_matches("0x"))
        .map_err(|_| invalid_params("Invalid address"))?;

    if address_bytes.len() != 32 {
        return Err(invalid_params("Invalid address length"));
    }

    let mut address = [0u8; 32];
    address.copy_from_slice(&address_bytes);
    Ok(address)
}

/// Parses an amount parameter, either a decimal string of base units
/// or a plain JSON number.
fn parse_amount(value: &serde_json::Value) -> Result<Balance, JsonRpcError> {
    if let Some(s) = value.as_str() {
        return s
            .parse::<Balance>()
            .map_err(|_| invalid_params("Invalid amount"));
    }
    if let Some(n) = value.as_u64() {
        return Ok(n as Balance);
    }
    Err(invalid_params("Invalid amount"))
}

/// Parses a role name parameter.
fn parse_role(value: &serde_json::Value) -> Result<Role, JsonRpcError> {
    let name = value
        .as_str()
        .ok_or_else(|| invalid_params("Invalid role"))?;
    Role::from_str(name).map_err(|e| invalid_params(&e))
}

/// Current unix time in seconds, for event timestamps.
fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Saves the state after a mutation and refreshes the gauges.
///
/// A failed save is logged but not surfaced: the operation has already
/// applied in memory, and the next successful save writes the whole
/// snapshot, so failing the response would only invite a double-apply
/// retry.
fn persist(state: &RpcState, pool: &LiquidityPool) {
    if let Err(e) = state.store.save(pool) {
        warn!("Failed to persist state, continuing in memory: {}", e);
    }
    metrics::update_state_gauges(pool);
}

/// Handles the getBalance method.
fn handle_get_balance(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 1)?;
    let address = parse_address(&params[0])?;

    let balance = {
        let pool = state.pool.lock().unwrap();
        pool.ledger().balance_of(&address)
    };

    Ok(serde_json::json!(balance.to_string()))
}

/// Handles the getTotalSupply method.
fn handle_get_total_supply(state: &RpcState) -> Result<serde_json::Value, JsonRpcError> {
    let total_supply = {
        let pool = state.pool.lock().unwrap();
        pool.ledger().total_supply()
    };

    Ok(serde_json::json!(total_supply.to_string()))
}

/// Handles the getAllowance method.
fn handle_get_allowance(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 2)?;
    let owner = parse_address(&params[0])?;
    let spender = parse_address(&params[1])?;

    let allowance = {
        let pool = state.pool.lock().unwrap();
        pool.ledger().allowance(&owner, &spender)
    };

    Ok(serde_json::json!(allowance.to_string()))
}

/// Handles the transfer method.
fn handle_transfer(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 3)?;
    let caller = parse_address(&params[0])?;
    let to = parse_address(&params[1])?;
    let amount = parse_amount(&params[2])?;

    let mut pool = state.pool.lock().unwrap();
    pool.ledger_mut()
        .transfer(&caller, &to, amount)
        .map_err(core_error)?;
    persist(state, &pool);
    metrics::TRANSFER_COUNTER.inc();

    Ok(serde_json::json!(true))
}

/// Handles the transferFrom method.
fn handle_transfer_from(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 4)?;
    let caller = parse_address(&params[0])?;
    let owner = parse_address(&params[1])?;
    let to = parse_address(&params[2])?;
    let amount = parse_amount(&params[3])?;

    let mut pool = state.pool.lock().unwrap();
    pool.ledger_mut()
        .transfer_from(&caller, &owner, &to, amount)
        .map_err(core_error)?;
    persist(state, &pool);
    metrics::TRANSFER_COUNTER.inc();

    Ok(serde_json::json!(true))
}

/// Handles the approve method.
fn handle_approve(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 3)?;
    let caller = parse_address(&params[0])?;
    let spender = parse_address(&params[1])?;
    let amount = parse_amount(&params[2])?;

    let mut pool = state.pool.lock().unwrap();
    pool.ledger_mut()
        .approve(&caller, &spender, amount)
        .map_err(core_error)?;
    persist(state, &pool);

    Ok(serde_json::json!(true))
}

/// Handles the mint method.
fn handle_mint(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 3)?;
    let caller = parse_address(&params[0])?;
    let to = parse_address(&params[1])?;
    let amount = parse_amount(&params[2])?;

    let mut pool = state.pool.lock().unwrap();
    pool.ledger_mut()
        .mint(&caller, &to, amount)
        .map_err(core_error)?;
    persist(state, &pool);
    metrics::MINT_COUNTER.inc();

    Ok(serde_json::json!(true))
}

/// Handles the burn method.
fn handle_burn(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 2)?;
    let caller = parse_address(&params[0])?;
    let amount = parse_amount(&params[1])?;

    let mut pool = state.pool.lock().unwrap();
    pool.ledger_mut().burn(&caller, amount).map_err(core_error)?;
    persist(state, &pool);

    Ok(serde_json::json!(true))
}

/// Handles the pause method.
fn handle_pause(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 1)?;
    let caller = parse_address(&params[0])?;

    let mut pool = state.pool.lock().unwrap();
    pool.ledger_mut().pause(&caller).map_err(core_error)?;
    persist(state, &pool);

    Ok(serde_json::json!(true))
}

/// Handles the unpause method.
fn handle_unpause(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 1)?;
    let caller = parse_address(&params[0])?;

    let mut pool = state.pool.lock().unwrap();
    pool.ledger_mut().unpause(&caller).map_err(core_error)?;
    persist(state, &pool);

    Ok(serde_json::json!(true))
}

/// Handles the grantRole method.
fn handle_grant_role(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 3)?;
    let caller = parse_address(&params[0])?;
    let role = parse_role(&params[1])?;
    let address = parse_address(&params[2])?;

    let mut pool = state.pool.lock().unwrap();
    pool.ledger_mut()
        .grant_role(&caller, role, &address)
        .map_err(core_error)?;
    persist(state, &pool);

    Ok(serde_json::json!(true))
}

/// Handles the revokeRole method.
fn handle_revoke_role(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 3)?;
    let caller = parse_address(&params[0])?;
    let role = parse_role(&params[1])?;
    let address = parse_address(&params[2])?;

    let mut pool = state.pool.lock().unwrap();
    pool.ledger_mut()
        .revoke_role(&caller, role, &address)
        .map_err(core_error)?;
    persist(state, &pool);

    Ok(serde_json::json!(true))
}

/// Handles the hasRole method.
fn handle_has_role(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 2)?;
    let role = parse_role(&params[0])?;
    let address = parse_address(&params[1])?;

    let held = {
        let pool = state.pool.lock().unwrap();
        pool.ledger().has_role(role, &address)
    };

    Ok(serde_json::json!(held))
}

/// Handles the getReserveBalance method.
fn handle_get_reserve_balance(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 1)?;
    let address = parse_address(&params[0])?;

    let balance = {
        let pool = state.pool.lock().unwrap();
        pool.reserve().balance_of(&address)
    };

    Ok(serde_json::json!(balance.to_string()))
}

/// Handles the approveReserve method.
fn handle_approve_reserve(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 3)?;
    let caller = parse_address(&params[0])?;
    let spender = parse_address(&params[1])?;
    let amount = parse_amount(&params[2])?;

    let mut pool = state.pool.lock().unwrap();
    pool.reserve_mut()
        .approve(&caller, &spender, amount)
        .map_err(core_error)?;
    persist(state, &pool);

    Ok(serde_json::json!(true))
}

/// Handles the mintReserve method.
fn handle_mint_reserve(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 3)?;
    let caller = parse_address(&params[0])?;
    let to = parse_address(&params[1])?;
    let amount = parse_amount(&params[2])?;

    let mut pool = state.pool.lock().unwrap();
    pool.reserve_mut()
        .mint(&caller, &to, amount)
        .map_err(core_error)?;
    persist(state, &pool);
    metrics::MINT_COUNTER.inc();

    Ok(serde_json::json!(true))
}

/// Handles the deposit method.
fn handle_deposit(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 2)?;
    let caller = parse_address(&params[0])?;
    let amount = parse_amount(&params[1])?;

    let mut pool = state.pool.lock().unwrap();
    let minted = pool
        .deposit_reserve(&caller, amount, unix_timestamp())
        .map_err(core_error)?;
    persist(state, &pool);
    metrics::DEPOSIT_COUNTER.inc();

    Ok(serde_json::json!(minted.to_string()))
}

/// Handles the withdraw method.
fn handle_withdraw(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 2)?;
    let caller = parse_address(&params[0])?;
    let amount = parse_amount(&params[1])?;

    let mut pool = state.pool.lock().unwrap();
    let paid = pool
        .withdraw(&caller, amount, unix_timestamp())
        .map_err(core_error)?;
    persist(state, &pool);
    metrics::WITHDRAW_COUNTER.inc();

    Ok(serde_json::json!(paid.to_string()))
}

/// Handles the getExchangeRate method.
fn handle_get_exchange_rate(state: &RpcState) -> Result<serde_json::Value, JsonRpcError> {
    let rate = {
        let pool = state.pool.lock().unwrap();
        pool.exchange_rate()
    };

    Ok(serde_json::json!(rate.to_string()))
}

/// Handles the updateExchangeRate method.
fn handle_update_exchange_rate(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 2)?;
    let caller = parse_address(&params[0])?;
    let new_rate = parse_amount(&params[1])?;

    let mut pool = state.pool.lock().unwrap();
    pool.update_exchange_rate(&caller, new_rate)
        .map_err(core_error)?;
    persist(state, &pool);

    Ok(serde_json::json!(true))
}

/// Handles the withdrawReserve method.
fn handle_withdraw_reserve(
    params: &serde_json::Value,
    state: &RpcState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params = expect_params(params, 3)?;
    let caller = parse_address(&params[0])?;
    let recipient = parse_address(&params[1])?;
    let amount = parse_amount(&params[2])?;

    let mut pool = state.pool.lock().unwrap();
    pool.withdraw_reserve(&caller, &recipient, amount)
        .map_err(core_error)?;
    persist(state, &pool);

    Ok(serde_json::json!(true))
}

/// Handles the getPoolInfo method.
fn handle_get_pool_info(state: &RpcState) -> Result<serde_json::Value, JsonRpcError> {
    let pool = state.pool.lock().unwrap();

    Ok(serde_json::json!({
        "address": format!("0x{}", hex::encode(pool.address())),
        "exchange_rate": pool.exchange_rate().to_string(),
        "reserve_custody": pool.reserve_custody().to_string(),
        "token": {
            "name": pool.ledger().name(),
            "symbol": pool.ledger().symbol(),
            "decimals": pool.ledger().decimals(),
            "total_supply": pool.ledger().total_supply().to_string(),
            "paused": pool.ledger().is_paused(),
        },
        "reserve": {
            "name": pool.reserve().name(),
            "symbol": pool.reserve().symbol(),
            "decimals": pool.reserve().decimals(),
            "total_supply": pool.reserve().total_supply().to_string(),
            "paused": pool.reserve().is_paused(),
        },
    }))
}

/// Handles the getPoolHistory method.
fn handle_get_pool_history(state: &RpcState) -> Result<serde_json::Value, JsonRpcError> {
    let pool = state.pool.lock().unwrap();

    let history: Vec<serde_json::Value> = pool
        .events()
        .iter()
        .map(|event| match event {
            PoolEvent::Deposit {
                user,
                amount,
                timestamp,
            } => serde_json::json!({
                "type": "deposit",
                "user": format!("0x{}", hex::encode(user)),
                "amount": amount.to_string(),
                "timestamp": timestamp,
            }),
            PoolEvent::Withdraw {
                user,
                amount,
                timestamp,
            } => serde_json::json!({
                "type": "withdraw",
                "user": format!("0x{}", hex::encode(user)),
                "amount": amount.to_string(),
                "timestamp": timestamp,
            }),
        })
        .collect();

    Ok(serde_json::json!(history))
}
