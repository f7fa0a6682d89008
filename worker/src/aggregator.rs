//! The stats aggregator — network statistics and node-count job bodies.
//!
//! Both jobs recompute their result in full from the network on every run,
//! so repeated runs converge to the latest truth regardless of prior run
//! outcomes. Neither accumulates: the snapshot series appends one immutable
//! row per run, and node counts are replaced by key.

use std::collections::BTreeMap;
use std::sync::Arc;

use keeper_network::NetworkClient;
use keeper_store::{ChainNodeCount, NetworkStatsSnapshot, StatsStore};
use keeper_types::{ChainId, ChainRegistry, Timestamp, TokenAmount};

use crate::JobError;

/// Outcome of one network-stats run.
#[derive(Debug)]
pub struct StatsReport {
    pub nodes_staked: u64,
    pub apps_staked: u64,
    pub tokens_staked: TokenAmount,
}

impl StatsReport {
    pub fn summary(&self) -> String {
        format!(
            "{} nodes, {} apps, {} tokens staked",
            self.nodes_staked, self.apps_staked, self.tokens_staked
        )
    }
}

/// Outcome of one node-count run.
#[derive(Debug, Default)]
pub struct NodeCountReport {
    /// Chains whose counts were written.
    pub written: u64,
    /// Unregistered chain ids observed in node data, logged and skipped.
    pub unknown_chains: Vec<JobError>,
}

impl NodeCountReport {
    pub fn summary(&self) -> String {
        format!(
            "updated {} chains, skipped {} unknown",
            self.written,
            self.unknown_chains.len()
        )
    }
}

/// Recomputes network-wide aggregates and writes snapshots/projections.
pub struct StatsAggregator {
    registry: ChainRegistry,
    stats: Arc<dyn StatsStore>,
    network: Arc<dyn NetworkClient>,
}

impl StatsAggregator {
    pub fn new(
        registry: ChainRegistry,
        stats: Arc<dyn StatsStore>,
        network: Arc<dyn NetworkClient>,
    ) -> Self {
        Self {
            registry,
            stats,
            network,
        }
    }

    /// Query all staked nodes and applications, sum their stakes with exact
    /// integer arithmetic, and append one snapshot row.
    ///
    /// An empty result from either query fails the run before anything is
    /// written: empty is indistinguishable from an outage, and a zero-valued
    /// snapshot would poison the time series.
    pub async fn network_stats(&self, now: Timestamp) -> Result<StatsReport, JobError> {
        let nodes = self.network.staked_nodes().await?;
        if nodes.is_empty() {
            return Err(JobError::EmptyNetworkResult { what: "staked nodes" });
        }
        let apps = self.network.staked_apps().await?;
        if apps.is_empty() {
            return Err(JobError::EmptyNetworkResult { what: "staked applications" });
        }

        let mut tokens_staked = TokenAmount::ZERO;
        for amount in nodes
            .iter()
            .map(|n| n.staked_tokens)
            .chain(apps.iter().map(|a| a.staked_tokens))
        {
            tokens_staked = tokens_staked
                .checked_add(amount)
                .ok_or_else(|| JobError::Internal("token total overflowed u128".to_string()))?;
        }

        let snapshot = NetworkStatsSnapshot {
            nodes_staked: nodes.len() as u64,
            apps_staked: apps.len() as u64,
            tokens_staked,
            created_at: now,
        };
        self.stats.append_snapshot(&snapshot)?;

        Ok(StatsReport {
            nodes_staked: snapshot.nodes_staked,
            apps_staked: snapshot.apps_staked,
            tokens_staked,
        })
    }

    /// Recompute per-chain node counts from the staked-node set and replace
    /// each registered chain's projection by key. A node serving k chains
    /// contributes to k counters. Unregistered chain ids are logged and
    /// skipped — one junk chain in node data must not starve the rest of the
    /// hourly update.
    pub async fn node_counts(&self) -> Result<NodeCountReport, JobError> {
        let nodes = self.network.staked_nodes().await?;
        if nodes.is_empty() {
            return Err(JobError::EmptyNetworkResult { what: "staked nodes" });
        }

        let mut counts: BTreeMap<ChainId, u64> = BTreeMap::new();
        for node in &nodes {
            for chain in &node.chains {
                *counts.entry(chain.clone()).or_insert(0) += 1;
            }
        }

        let mut report = NodeCountReport::default();
        for (chain_id, node_count) in counts {
            if !self.registry.contains(&chain_id) {
                tracing::warn!(chain = %chain_id, "node data references unregistered chain, skipping");
                report
                    .unknown_chains
                    .push(JobError::UnknownChain { chain: chain_id });
                continue;
            }
            self.stats.upsert_node_count(&ChainNodeCount {
                chain_id,
                node_count,
            })?;
            report.written += 1;
        }

        Ok(report)
    }
}
