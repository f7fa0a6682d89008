//! Abstract storage traits for the keeper workers.
//!
//! The production document store is an external collaborator; every backend
//! (the bundled in-memory store, a document-database adapter) implements
//! these traits. The workers depend only on the traits.
//!
//! The per-account write discipline lives at this seam: status changes go
//! through compare-and-swap ([`PoolStore::transition_status`]) and every
//! stake/unstake submission is bracketed by a per-account lease
//! ([`PoolStore::try_lease`] / [`PoolStore::release_lease`]), so two
//! overlapping runs can never mutate the same account concurrently.

pub mod account;
pub mod error;
pub mod stats;

pub use account::{PoolAccount, PoolStore};
pub use error::StoreError;
pub use stats::{ChainNodeCount, NetworkStatsSnapshot, StatsStore};
