//! The network client trait and its wire-facing types.

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use keeper_types::{AccountAddress, ChainId, PublicKey, TokenAmount};

use crate::NetworkError;

/// A node staked on the network, as reported by the staked-nodes query.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakedNode {
    pub address: AccountAddress,
    pub staked_tokens: TokenAmount,
    /// Chain ids this node serves relays for.
    pub chains: Vec<ChainId>,
}

/// An application staked on the network.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakedApp {
    pub address: AccountAddress,
    pub staked_tokens: TokenAmount,
}

/// Everything the network needs to stake or unstake one pooled account.
/// Built by the reconciler from a pool record; key custody stays on the
/// keeper side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeOrder {
    pub chain_id: ChainId,
    pub address: AccountAddress,
    pub public_key: PublicKey,
}

/// Receipt for a submitted stake/unstake transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
}

/// Read and write access to the relay network.
///
/// Object-safe (methods return [`BoxFuture`]) so implementations can sit
/// behind `Arc<dyn NetworkClient>` across the worker tasks.
pub trait NetworkClient: Send + Sync {
    /// All nodes currently staked on the network.
    fn staked_nodes(&self) -> BoxFuture<'_, Result<Vec<StakedNode>, NetworkError>>;

    /// All applications currently staked on the network.
    fn staked_apps(&self) -> BoxFuture<'_, Result<Vec<StakedApp>, NetworkError>>;

    /// Submit a stake transaction for one account.
    fn submit_stake<'a>(
        &'a self,
        order: &'a StakeOrder,
    ) -> BoxFuture<'a, Result<TxReceipt, NetworkError>>;

    /// Submit an unstake transaction for one account.
    fn submit_unstake<'a>(
        &'a self,
        order: &'a StakeOrder,
    ) -> BoxFuture<'a, Result<TxReceipt, NetworkError>>;
}
