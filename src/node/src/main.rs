//! Node daemon for the reserve-backed token mill.

use anyhow::Result;
use millpond_node::config::NodeConfig;
use millpond_node::genesis;
use millpond_node::metrics::{self, register_metrics};
use millpond_node::rpc;
use millpond_node::store::StateStore;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the node daemon.
#[derive(Debug, StructOpt)]
#[structopt(name = "millpond-node", about = "Reserve-backed token ledger node")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Path to the data directory
    #[structopt(short, long, parse(from_os_str))]
    data_dir: Option<PathBuf>,

    /// JSON-RPC server address
    #[structopt(long)]
    rpc_addr: Option<String>,

    /// Enable metrics server
    #[structopt(long)]
    metrics: bool,

    /// Metrics server address
    #[structopt(long)]
    metrics_addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    // Load configuration
    let config = match &opt.config {
        Some(path) => NodeConfig::from_file(path)?,
        None => NodeConfig::default(),
    };

    // Determine data directory
    let data_dir = opt
        .data_dir
        .unwrap_or_else(|| match config.storage.data_dir.as_str() {
            "" => {
                let mut dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
                dir.push("millpond");
                dir
            }
            path => PathBuf::from(path),
        });

    // Create data directory if it doesn't exist
    std::fs::create_dir_all(&data_dir)?;

    // Open the state store
    let store_path = data_dir.join("state");
    info!("Opening state store at {}", store_path.display());
    let store = StateStore::open(&store_path)?;

    // Load saved state or build the genesis state
    let pool = match store.load()? {
        Some(pool) => {
            info!(
                "Loaded pool state: supply {}, custody {}, rate {}",
                pool.ledger().total_supply(),
                pool.reserve_custody(),
                pool.exchange_rate()
            );
            pool
        }
        None => {
            info!("No saved state found, building genesis state");
            let pool = genesis::build(&config)?;
            store.save(&pool)?;
            pool
        }
    };
    let pool = Arc::new(Mutex::new(pool));

    // Start the metrics server if enabled
    if opt.metrics || config.metrics.enabled {
        register_metrics();
        {
            let pool = pool.lock().unwrap();
            metrics::update_state_gauges(&pool);
        }
        let metrics_addr: std::net::SocketAddr = opt
            .metrics_addr
            .unwrap_or_else(|| config.metrics.listen_addr.clone())
            .parse()?;
        metrics::start_metrics_server(metrics_addr).await?;
        info!("Metrics server listening on {}", metrics_addr);
    }

    // Start the JSON-RPC server
    let rpc_addr: std::net::SocketAddr = opt
        .rpc_addr
        .unwrap_or_else(|| config.rpc.listen_addr.clone())
        .parse()?;
    rpc::start_rpc_server(rpc_addr, pool.clone(), store.clone()).await?;
    info!("JSON-RPC server listening on {}", rpc_addr);

    info!("Node started");
    tokio::signal::ctrl_c().await?;

    // Write a final snapshot before exiting
    {
        let pool = pool.lock().unwrap();
        store.save(&pool)?;
    }
    info!("Shutting down");

    Ok(())
}
