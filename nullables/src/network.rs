//! Nullable network — scripted query results, programmable submission
//! failures, recorded transactions.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use keeper_network::{NetworkClient, NetworkError, StakeOrder, StakedApp, StakedNode, TxReceipt};
use keeper_types::AccountAddress;

/// A test network that serves scripted state and records submissions.
#[derive(Default)]
pub struct NullNetwork {
    nodes: Mutex<Vec<StakedNode>>,
    apps: Mutex<Vec<StakedApp>>,
    /// Addresses whose stake submission should be rejected.
    failing_stakes: Mutex<HashSet<String>>,
    /// Addresses whose unstake submission should be rejected.
    failing_unstakes: Mutex<HashSet<String>>,
    /// When set, both queries fail with a transport error.
    queries_down: AtomicBool,
    /// Every stake order received, including rejected ones.
    submitted_stakes: Mutex<Vec<StakeOrder>>,
    /// Every unstake order received, including rejected ones.
    submitted_unstakes: Mutex<Vec<StakeOrder>>,
}

impl NullNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the staked-nodes query result.
    pub fn set_nodes(&self, nodes: Vec<StakedNode>) {
        *self.nodes.lock().unwrap() = nodes;
    }

    /// Script the staked-apps query result.
    pub fn set_apps(&self, apps: Vec<StakedApp>) {
        *self.apps.lock().unwrap() = apps;
    }

    /// Remove one app from the scripted staked set (an unstake "confirming").
    pub fn remove_app(&self, address: &AccountAddress) {
        self.apps
            .lock()
            .unwrap()
            .retain(|a| a.address != *address);
    }

    /// Reject stake submissions for this address.
    pub fn fail_stake_for(&self, address: &AccountAddress) {
        self.failing_stakes
            .lock()
            .unwrap()
            .insert(address.as_str().to_string());
    }

    /// Reject unstake submissions for this address.
    pub fn fail_unstake_for(&self, address: &AccountAddress) {
        self.failing_unstakes
            .lock()
            .unwrap()
            .insert(address.as_str().to_string());
    }

    /// Make both queries fail with a transport error.
    pub fn set_queries_down(&self, down: bool) {
        self.queries_down.store(down, Ordering::SeqCst);
    }

    /// All stake orders received so far, rejected ones included.
    pub fn stakes_submitted(&self) -> Vec<StakeOrder> {
        self.submitted_stakes.lock().unwrap().clone()
    }

    /// All unstake orders received so far, rejected ones included.
    pub fn unstakes_submitted(&self) -> Vec<StakeOrder> {
        self.submitted_unstakes.lock().unwrap().clone()
    }

    fn check_up(&self) -> Result<(), NetworkError> {
        if self.queries_down.load(Ordering::SeqCst) {
            Err(NetworkError::Transport("scripted outage".to_string()))
        } else {
            Ok(())
        }
    }
}

impl NetworkClient for NullNetwork {
    fn staked_nodes(&self) -> BoxFuture<'_, Result<Vec<StakedNode>, NetworkError>> {
        async move {
            self.check_up()?;
            Ok(self.nodes.lock().unwrap().clone())
        }
        .boxed()
    }

    fn staked_apps(&self) -> BoxFuture<'_, Result<Vec<StakedApp>, NetworkError>> {
        async move {
            self.check_up()?;
            Ok(self.apps.lock().unwrap().clone())
        }
        .boxed()
    }

    fn submit_stake<'a>(
        &'a self,
        order: &'a StakeOrder,
    ) -> BoxFuture<'a, Result<TxReceipt, NetworkError>> {
        async move {
            self.submitted_stakes.lock().unwrap().push(order.clone());
            if self
                .failing_stakes
                .lock()
                .unwrap()
                .contains(order.address.as_str())
            {
                return Err(NetworkError::TxRejected("scripted rejection".to_string()));
            }
            Ok(TxReceipt {
                tx_hash: format!("stake-{}", order.address),
            })
        }
        .boxed()
    }

    fn submit_unstake<'a>(
        &'a self,
        order: &'a StakeOrder,
    ) -> BoxFuture<'a, Result<TxReceipt, NetworkError>> {
        async move {
            self.submitted_unstakes.lock().unwrap().push(order.clone());
            if self
                .failing_unstakes
                .lock()
                .unwrap()
                .contains(order.address.as_str())
            {
                return Err(NetworkError::TxRejected("scripted rejection".to_string()));
            }
            Ok(TxReceipt {
                tx_hash: format!("unstake-{}", order.address),
            })
        }
        .boxed()
    }
}
