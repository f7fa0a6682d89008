//! Aggregated network statistics records and storage trait.

use serde::{Deserialize, Serialize};

use keeper_types::{ChainId, Timestamp, TokenAmount};

use crate::StoreError;

/// One aggregation run's network-wide totals.
///
/// Append-only time series: a row is inserted per successful run and never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatsSnapshot {
    /// Total nodes staked on the network.
    pub nodes_staked: u64,
    /// Total applications staked on the network.
    pub apps_staked: u64,
    /// Total tokens staked across nodes and applications.
    pub tokens_staked: TokenAmount,
    pub created_at: Timestamp,
}

/// Per-chain node count projection, replaced in full on every run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainNodeCount {
    pub chain_id: ChainId,
    pub node_count: u64,
}

/// Trait for statistics storage operations.
pub trait StatsStore: Send + Sync {
    /// Append a snapshot to the time series. Fails with
    /// [`StoreError::NonMonotonicSnapshot`] unless `created_at` is strictly
    /// greater than the latest stored snapshot's.
    fn append_snapshot(&self, snapshot: &NetworkStatsSnapshot) -> Result<(), StoreError>;

    fn latest_snapshot(&self) -> Result<Option<NetworkStatsSnapshot>, StoreError>;

    fn snapshot_count(&self) -> Result<u64, StoreError>;

    /// Current node count for a chain, if one has been recorded.
    fn node_count(&self, chain: &ChainId) -> Result<Option<ChainNodeCount>, StoreError>;

    /// Replace-by-key write of a chain's node count, creating it if absent.
    fn upsert_node_count(&self, count: &ChainNodeCount) -> Result<(), StoreError>;

    fn all_node_counts(&self) -> Result<Vec<ChainNodeCount>, StoreError>;
}
