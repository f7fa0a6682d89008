//! The keeper — wires the workers together and runs the job loops.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use keeper_crypto::AccountSource;
use keeper_network::NetworkClient;
use keeper_store::{PoolStore, StatsStore};
use keeper_types::{ChainRegistry, Timestamp};

use crate::aggregator::StatsAggregator;
use crate::config::WorkerConfig;
use crate::reconciler::PoolReconciler;
use crate::scheduler::spawn_recurring;
use crate::shutdown::ShutdownController;
use crate::{JobError, WorkerMetrics};

/// Timeout for waiting on job loops during shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A running keeper: the pool reconciler and stats aggregator behind their
/// five recurring job loops.
pub struct Keeper {
    config: WorkerConfig,
    reconciler: Arc<PoolReconciler>,
    aggregator: Arc<StatsAggregator>,
    metrics: Arc<WorkerMetrics>,
    shutdown: Arc<ShutdownController>,
    /// Handles for spawned job loops (joined during shutdown).
    task_handles: Vec<JoinHandle<()>>,
}

impl Keeper {
    /// Wire the workers. Fails fast with a configuration error rather than
    /// start against an empty chain set.
    pub fn new(
        config: WorkerConfig,
        registry: ChainRegistry,
        pool_store: Arc<dyn PoolStore>,
        stats_store: Arc<dyn StatsStore>,
        network: Arc<dyn NetworkClient>,
        accounts: Arc<dyn AccountSource>,
    ) -> Result<Self, JobError> {
        if registry.is_empty() {
            return Err(JobError::Config(
                "chain registry is empty; refusing to start".to_string(),
            ));
        }

        let reconciler = Arc::new(PoolReconciler::new(
            registry.clone(),
            pool_store,
            Arc::clone(&network),
            accounts,
        ));
        let aggregator = Arc::new(StatsAggregator::new(registry, stats_store, network));

        Ok(Self {
            config,
            reconciler,
            aggregator,
            metrics: Arc::new(WorkerMetrics::new()),
            shutdown: Arc::new(ShutdownController::new()),
            task_handles: Vec::new(),
        })
    }

    /// Spawn all five job loops. Returns immediately; the loops run until
    /// [`stop`](Self::stop) or a shutdown signal.
    pub fn start(&mut self) {
        tracing::info!(
            environment = %self.config.environment,
            fill_secs = self.config.fill_interval_secs,
            stake_secs = self.config.stake_interval_secs,
            decommission_secs = self.config.decommission_interval_secs,
            stats_secs = self.config.stats_interval_secs,
            "starting keeper job loops"
        );

        let reconciler = Arc::clone(&self.reconciler);
        self.task_handles.push(spawn_recurring(
            "pool_fill",
            Duration::from_secs(self.config.fill_interval_secs),
            self.shutdown.subscribe(),
            Arc::clone(&self.metrics),
            move || {
                let reconciler = Arc::clone(&reconciler);
                async move { reconciler.fill(Timestamp::now()).map(|r| r.summary()) }
            },
        ));

        let reconciler = Arc::clone(&self.reconciler);
        self.task_handles.push(spawn_recurring(
            "pool_stake",
            Duration::from_secs(self.config.stake_interval_secs),
            self.shutdown.subscribe(),
            Arc::clone(&self.metrics),
            move || {
                let reconciler = Arc::clone(&reconciler);
                async move { reconciler.stake().await.map(|r| r.summary()) }
            },
        ));

        let reconciler = Arc::clone(&self.reconciler);
        self.task_handles.push(spawn_recurring(
            "pool_decommission",
            Duration::from_secs(self.config.decommission_interval_secs),
            self.shutdown.subscribe(),
            Arc::clone(&self.metrics),
            move || {
                let reconciler = Arc::clone(&reconciler);
                async move { reconciler.decommission().await.map(|r| r.summary()) }
            },
        ));

        let aggregator = Arc::clone(&self.aggregator);
        let metrics = Arc::clone(&self.metrics);
        self.task_handles.push(spawn_recurring(
            "network_stats",
            Duration::from_secs(self.config.stats_interval_secs),
            self.shutdown.subscribe(),
            Arc::clone(&self.metrics),
            move || {
                let aggregator = Arc::clone(&aggregator);
                let metrics = Arc::clone(&metrics);
                async move {
                    let report = aggregator.network_stats(Timestamp::now()).await?;
                    metrics.nodes_staked.set(report.nodes_staked as i64);
                    metrics.apps_staked.set(report.apps_staked as i64);
                    Ok(report.summary())
                }
            },
        ));

        let aggregator = Arc::clone(&self.aggregator);
        self.task_handles.push(spawn_recurring(
            "chain_node_counts",
            Duration::from_secs(self.config.stats_interval_secs),
            self.shutdown.subscribe(),
            Arc::clone(&self.metrics),
            move || {
                let aggregator = Arc::clone(&aggregator);
                async move { aggregator.node_counts().await.map(|r| r.summary()) }
            },
        ));
    }

    /// Signal shutdown and join every job loop, bounded by a timeout.
    pub async fn stop(&mut self) {
        self.shutdown.shutdown();
        for handle in self.task_handles.drain(..) {
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await.is_err() {
                tracing::warn!("job loop did not exit within the shutdown timeout");
            }
        }
    }

    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    pub fn metrics(&self) -> Arc<WorkerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Direct access to the reconciler (single-run invocations in tests and
    /// operational tooling).
    pub fn reconciler(&self) -> Arc<PoolReconciler> {
        Arc::clone(&self.reconciler)
    }

    /// Direct access to the aggregator.
    pub fn aggregator(&self) -> Arc<StatsAggregator> {
        Arc::clone(&self.aggregator)
    }
}
