//! Keeper daemon — entry point for running the reconciliation workers.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use keeper_crypto::SystemAccountSource;
use keeper_network::RpcNetworkClient;
use keeper_store::{PoolStore, StatsStore};
use keeper_store_mem::MemoryStore;
use keeper_types::{ChainRegistry, Environment};
use keeper_utils::{init_logging, LogFormat};
use keeper_worker::{Keeper, WorkerConfig};

#[derive(Parser)]
#[command(name = "keeper-daemon", about = "Relay network pool keeper daemon")]
struct Cli {
    /// Environment: "development" or "production".
    /// When a config file is provided, defaults to the file's value.
    #[arg(long, env = "KEEPER_ENVIRONMENT")]
    environment: Option<String>,

    /// Base URL of the relay network gateway.
    #[arg(long, env = "KEEPER_NETWORK_URL")]
    network_url: Option<String>,

    /// Pool fill cadence in seconds.
    #[arg(long, env = "KEEPER_FILL_INTERVAL_SECS")]
    fill_interval_secs: Option<u64>,

    /// Pool stake cadence in seconds.
    #[arg(long, env = "KEEPER_STAKE_INTERVAL_SECS")]
    stake_interval_secs: Option<u64>,

    /// Pool decommission cadence in seconds.
    #[arg(long, env = "KEEPER_DECOMMISSION_INTERVAL_SECS")]
    decommission_interval_secs: Option<u64>,

    /// Statistics cadence in seconds.
    #[arg(long, env = "KEEPER_STATS_INTERVAL_SECS")]
    stats_interval_secs: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "KEEPER_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "KEEPER_LOG_FORMAT")]
    log_format: String,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the reconciliation workers.
    #[command(name = "run")]
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match cli.config {
        Some(ref path) => WorkerConfig::from_toml_file(
            path.to_str()
                .ok_or_else(|| anyhow::anyhow!("config path is not valid UTF-8"))?,
        )?,
        None => WorkerConfig::default(),
    };

    let environment = match cli.environment {
        Some(ref s) => s.parse::<Environment>()?,
        None => base.environment,
    };

    let config = WorkerConfig {
        environment,
        network_url: cli.network_url.unwrap_or(base.network_url),
        fill_interval_secs: cli.fill_interval_secs.unwrap_or(base.fill_interval_secs),
        stake_interval_secs: cli.stake_interval_secs.unwrap_or(base.stake_interval_secs),
        decommission_interval_secs: cli
            .decommission_interval_secs
            .unwrap_or(base.decommission_interval_secs),
        stats_interval_secs: cli.stats_interval_secs.unwrap_or(base.stats_interval_secs),
        log_level: cli.log_level,
        log_format: cli.log_format,
    };

    init_logging(LogFormat::from_config(&config.log_format), &config.log_level);

    match cli.command {
        Command::Run => {
            // Resolving the registry is the startup gate: an unknown
            // environment never gets this far, and an empty table is
            // rejected by Keeper::new.
            let registry = ChainRegistry::for_environment(config.environment);
            tracing::info!(
                environment = %config.environment,
                chains = registry.len(),
                gateway = %config.network_url,
                "starting keeper"
            );

            let store = Arc::new(MemoryStore::new());
            let network = Arc::new(RpcNetworkClient::new(&config.network_url));
            let accounts = Arc::new(SystemAccountSource);

            let mut keeper = Keeper::new(
                config,
                registry,
                Arc::clone(&store) as Arc<dyn PoolStore>,
                store as Arc<dyn StatsStore>,
                network as _,
                accounts as _,
            )?;
            keeper.start();

            keeper.shutdown_controller().wait_for_signal().await;

            tracing::info!("shutdown signal received — stopping job loops");
            keeper.stop().await;
            tracing::info!("keeper daemon exited cleanly");
        }
    }

    Ok(())
}
