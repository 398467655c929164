//! Metrics for the node daemon.

use anyhow::Result;
use lazy_static::lazy_static;
use millpond_core::LiquidityPool;
use prometheus::{
    register_counter, register_gauge, register_histogram, Counter, Gauge, Histogram, HistogramOpts,
    Opts,
};
use std::net::SocketAddr;
use warp::Filter;

lazy_static! {
    /// Counter for the number of RPC requests handled.
    pub static ref RPC_REQUEST_COUNTER: Counter = register_counter!(
        Opts::new(
            "rpc_requests_total",
            "Total number of RPC requests handled"
        )
    )
    .unwrap();

    /// Counter for the number of token transfers applied.
    pub static ref TRANSFER_COUNTER: Counter = register_counter!(
        Opts::new(
            "transfers_total",
            "Total number of token transfers applied"
        )
    )
    .unwrap();

    /// Counter for the number of mints applied.
    pub static ref MINT_COUNTER: Counter = register_counter!(
        Opts::new(
            "mints_total",
            "Total number of mints applied"
        )
    )
    .unwrap();

    /// Counter for the number of reserve deposits.
    pub static ref DEPOSIT_COUNTER: Counter = register_counter!(
        Opts::new(
            "deposits_total",
            "Total number of reserve deposits"
        )
    )
    .unwrap();

    /// Counter for the number of withdrawals.
    pub static ref WITHDRAW_COUNTER: Counter = register_counter!(
        Opts::new(
            "withdrawals_total",
            "Total number of withdrawals"
        )
    )
    .unwrap();

    /// Gauge for the issued token supply, in base units.
    pub static ref TOTAL_SUPPLY_GAUGE: Gauge = register_gauge!(
        Opts::new(
            "ledger_total_supply",
            "Issued token supply in base units"
        )
    )
    .unwrap();

    /// Gauge for the reserve amount held in custody, in base units.
    pub static ref RESERVE_CUSTODY_GAUGE: Gauge = register_gauge!(
        Opts::new(
            "reserve_custody",
            "Reserve held in pool custody in base units"
        )
    )
    .unwrap();

    /// Gauge for the current exchange rate.
    pub static ref EXCHANGE_RATE_GAUGE: Gauge = register_gauge!(
        Opts::new(
            "exchange_rate",
            "Ledger units minted per reserve unit"
        )
    )
    .unwrap();

    /// Histogram for RPC request handling time.
    pub static ref RPC_REQUEST_DURATION: Histogram = register_histogram!(
        HistogramOpts::new(
            "rpc_request_duration_seconds",
            "Time to handle an RPC request"
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0])
    )
    .unwrap();
}

/// Registers all metrics.
pub fn register_metrics() {
    // Metrics are registered via lazy_static
}

/// Refreshes the state gauges from the current pool.
pub fn update_state_gauges(pool: &LiquidityPool) {
    TOTAL_SUPPLY_GAUGE.set(pool.ledger().total_supply() as f64);
    RESERVE_CUSTODY_GAUGE.set(pool.reserve_custody() as f64);
    EXCHANGE_RATE_GAUGE.set(pool.exchange_rate() as f64);
}

/// Starts the metrics server.
pub async fn start_metrics_server(addr: SocketAddr) -> Result<()> {
    let metrics_route = warp::path("metrics").map(|| {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    });

    tokio::spawn(async move {
        warp::serve(metrics_route).run(addr).await;
    });

    Ok(())
}
