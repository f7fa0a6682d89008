//! The pool reconciler — fill, stake, and decommission job bodies.
//!
//! Converges each chain's reserve of application accounts toward its
//! configured capacity and walks accounts through their lifecycle
//! (Unstaked → Staked → Unstaking → removed). Every run is idempotent:
//! fill counts before it creates, stake budgets against the live Staked
//! count, and decommission only acts on observed overflow, so re-running
//! against a converged pool is a no-op.
//!
//! One account's failure never aborts the rest of a run. Failures are
//! collected into the run report with their error kind; only a failure of
//! the run's own preconditions (a store read, a critical network query)
//! aborts early.

use std::collections::HashSet;
use std::sync::Arc;

use keeper_crypto::AccountSource;
use keeper_network::{NetworkClient, StakeOrder};
use keeper_store::{PoolAccount, PoolStore};
use keeper_types::{AccountStatus, ChainRegistry, Timestamp};

use crate::JobError;

/// Outcome of one fill run.
#[derive(Debug, Default)]
pub struct FillReport {
    /// Accounts generated and persisted.
    pub created: u64,
    /// Per-account failures (generation or persistence), run not aborted.
    pub failures: Vec<JobError>,
}

impl FillReport {
    pub fn summary(&self) -> String {
        format!("created {} accounts, {} failures", self.created, self.failures.len())
    }
}

/// Outcome of one stake run.
#[derive(Debug, Default)]
pub struct StakeReport {
    /// Accounts confirmed Staked this run.
    pub staked: u64,
    /// Accounts skipped because another holder had their lease.
    pub skipped_leased: u64,
    /// Per-account failures, left Unstaked for the next run.
    pub failures: Vec<JobError>,
}

impl StakeReport {
    pub fn summary(&self) -> String {
        format!(
            "staked {}, lease-skipped {}, {} failures",
            self.staked,
            self.skipped_leased,
            self.failures.len()
        )
    }
}

/// Outcome of one decommission run.
#[derive(Debug, Default)]
pub struct DecommissionReport {
    /// Accounts moved Staked → Unstaking this run.
    pub unstaking: u64,
    /// Unstaking accounts whose release confirmed and were removed.
    pub removed: u64,
    /// Accounts skipped because another holder had their lease.
    pub skipped_leased: u64,
    /// Per-account failures, statuses unchanged.
    pub failures: Vec<JobError>,
}

impl DecommissionReport {
    pub fn summary(&self) -> String {
        format!(
            "unstaking {}, removed {}, lease-skipped {}, {} failures",
            self.unstaking,
            self.removed,
            self.skipped_leased,
            self.failures.len()
        )
    }
}

/// Converges pool contents toward configured per-chain capacity.
pub struct PoolReconciler {
    registry: ChainRegistry,
    store: Arc<dyn PoolStore>,
    network: Arc<dyn NetworkClient>,
    accounts: Arc<dyn AccountSource>,
}

impl PoolReconciler {
    pub fn new(
        registry: ChainRegistry,
        store: Arc<dyn PoolStore>,
        network: Arc<dyn NetworkClient>,
        accounts: Arc<dyn AccountSource>,
    ) -> Self {
        Self {
            registry,
            store,
            network,
            accounts,
        }
    }

    /// Top the pool up: for every chain whose Unstaked + Staked count is
    /// below capacity, generate and persist Unstaked accounts to close the
    /// gap. Count-then-create keeps this safe to run every minute.
    pub fn fill(&self, now: Timestamp) -> Result<FillReport, JobError> {
        let mut report = FillReport::default();

        for chain in self.registry.iter() {
            let pooled = self.store.pooled_count(&chain.id)?;
            let deficit = u64::from(chain.capacity).saturating_sub(pooled);
            if deficit == 0 {
                continue;
            }
            tracing::debug!(chain = %chain.id, pooled, deficit, "filling pool");

            for _ in 0..deficit {
                let identity = match self.accounts.generate_account() {
                    Ok(identity) => identity,
                    Err(e) => {
                        report.failures.push(JobError::Entity {
                            address: format!("{}:<new>", chain.id),
                            reason: format!("key generation failed: {e}"),
                        });
                        continue;
                    }
                };

                let account = PoolAccount {
                    chain_id: chain.id.clone(),
                    address: identity.address.clone(),
                    public_key: identity.keypair.public.clone(),
                    private_key: identity.keypair.private.clone(),
                    passphrase: identity.passphrase,
                    status: AccountStatus::Unstaked,
                    signed_aat: identity.signed_aat,
                    created_at: now,
                };
                match self.store.create_account(&account) {
                    Ok(()) => report.created += 1,
                    Err(e) => report.failures.push(JobError::Entity {
                        address: identity.address.to_string(),
                        reason: format!("persist failed: {e}"),
                    }),
                }
            }
        }

        for failure in &report.failures {
            tracing::warn!(%failure, "fill: account skipped");
        }
        Ok(report)
    }

    /// Submit stake transactions for Unstaked accounts, bounded per chain by
    /// `capacity − currently Staked`. Each submission is bracketed by the
    /// account's lease so an overlapping run can never double-stake it; the
    /// status flip is a compare-and-swap for the same reason.
    pub async fn stake(&self) -> Result<StakeReport, JobError> {
        let mut report = StakeReport::default();

        for chain in self.registry.iter() {
            let staked = self.store.count_by_status(&chain.id, AccountStatus::Staked)?;
            let budget = u64::from(chain.capacity).saturating_sub(staked) as usize;
            if budget == 0 {
                continue;
            }

            let candidates = self
                .store
                .accounts_by_status(&chain.id, AccountStatus::Unstaked)?;

            for account in candidates.into_iter().take(budget) {
                if !self.store.try_lease(&account.address)? {
                    report.skipped_leased += 1;
                    continue;
                }

                let order = stake_order(&account);
                match self.network.submit_stake(&order).await {
                    Ok(receipt) => {
                        tracing::info!(
                            chain = %chain.id,
                            address = %account.address,
                            tx = %receipt.tx_hash,
                            "stake confirmed"
                        );
                        if let Err(e) = self.store.transition_status(
                            &account.address,
                            AccountStatus::Unstaked,
                            AccountStatus::Staked,
                        ) {
                            report.failures.push(JobError::Entity {
                                address: account.address.to_string(),
                                reason: format!("status flip after stake failed: {e}"),
                            });
                        } else {
                            report.staked += 1;
                        }
                    }
                    // Leave the account Unstaked; the next run retries it.
                    Err(e) => report.failures.push(JobError::Entity {
                        address: account.address.to_string(),
                        reason: format!("stake submission failed: {e}"),
                    }),
                }
                self.store.release_lease(&account.address)?;
            }
        }

        for failure in &report.failures {
            tracing::warn!(%failure, "stake: account skipped");
        }
        Ok(report)
    }

    /// Decommission pass, two phases per chain:
    ///
    /// 1. Sweep Unstaking accounts: one whose address has left the network's
    ///    staked-application set has finished unstaking and is removed. The
    ///    sweep is withheld when the staked set comes back empty — during an
    ///    outage every account would look released.
    /// 2. Capacity overflow: if more accounts are Staked than the chain's
    ///    capacity allows, unstake the excess, oldest first.
    ///
    /// An unstake that never confirms leaves its account parked in Unstaking,
    /// where it counts toward nothing and is retried by the sweep forever.
    pub async fn decommission(&self) -> Result<DecommissionReport, JobError> {
        let mut report = DecommissionReport::default();

        let staked_apps = self.network.staked_apps().await?;
        let staked_set: HashSet<&str> = staked_apps
            .iter()
            .map(|a| a.address.as_str())
            .collect();
        let sweep_safe = !staked_set.is_empty();

        for chain in self.registry.iter() {
            // Phase 1: resolve completed unstakes.
            let unstaking = self
                .store
                .accounts_by_status(&chain.id, AccountStatus::Unstaking)?;
            if !sweep_safe && !unstaking.is_empty() {
                tracing::warn!(
                    chain = %chain.id,
                    pending = unstaking.len(),
                    "staked-application set is empty; withholding unstake sweep"
                );
            } else {
                for account in unstaking {
                    if staked_set.contains(account.address.as_str()) {
                        continue; // still releasing
                    }
                    match self.store.remove_account(&account.address) {
                        Ok(()) => {
                            tracing::info!(
                                chain = %chain.id,
                                address = %account.address,
                                "unstake confirmed, account removed"
                            );
                            report.removed += 1;
                        }
                        Err(e) => report.failures.push(JobError::Entity {
                            address: account.address.to_string(),
                            reason: format!("removal failed: {e}"),
                        }),
                    }
                }
            }

            // Phase 2: shed capacity overflow, oldest first.
            let staked = self
                .store
                .accounts_by_status(&chain.id, AccountStatus::Staked)?;
            let capacity = chain.capacity as usize;
            if staked.len() <= capacity {
                continue;
            }
            let excess = staked.len() - capacity;
            tracing::info!(chain = %chain.id, excess, "pool over capacity, decommissioning");

            for account in staked.into_iter().take(excess) {
                if !self.store.try_lease(&account.address)? {
                    report.skipped_leased += 1;
                    continue;
                }

                let order = stake_order(&account);
                match self.network.submit_unstake(&order).await {
                    Ok(receipt) => {
                        tracing::info!(
                            chain = %chain.id,
                            address = %account.address,
                            tx = %receipt.tx_hash,
                            "unstake submitted"
                        );
                        if let Err(e) = self.store.transition_status(
                            &account.address,
                            AccountStatus::Staked,
                            AccountStatus::Unstaking,
                        ) {
                            report.failures.push(JobError::Entity {
                                address: account.address.to_string(),
                                reason: format!("status flip after unstake failed: {e}"),
                            });
                        } else {
                            report.unstaking += 1;
                        }
                    }
                    Err(e) => report.failures.push(JobError::Entity {
                        address: account.address.to_string(),
                        reason: format!("unstake submission failed: {e}"),
                    }),
                }
                self.store.release_lease(&account.address)?;
            }
        }

        for failure in &report.failures {
            tracing::warn!(%failure, "decommission: account skipped");
        }
        Ok(report)
    }
}

fn stake_order(account: &PoolAccount) -> StakeOrder {
    StakeOrder {
        chain_id: account.chain_id.clone(),
        address: account.address.clone(),
        public_key: account.public_key.clone(),
    }
}
