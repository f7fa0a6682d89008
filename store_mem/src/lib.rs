//! In-memory storage backend.
//!
//! Implements both keeper storage traits over `Mutex<HashMap>` tables.
//! Thread-safe for use with tokio's multi-threaded runtime. Used by the
//! daemon when no external document-store adapter is wired in, and by the
//! worker tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use keeper_store::{ChainNodeCount, NetworkStatsSnapshot, PoolAccount, PoolStore, StatsStore};
use keeper_store::StoreError;
use keeper_types::{AccountAddress, AccountStatus, ChainId};

/// An in-memory pool + stats store.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<String, PoolAccount>>,
    leases: Mutex<HashSet<String>>,
    snapshots: Mutex<Vec<NetworkStatsSnapshot>>,
    node_counts: Mutex<HashMap<String, ChainNodeCount>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total accounts across all chains and statuses (for assertions).
    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    /// All snapshots in insertion order (for assertions).
    pub fn snapshots(&self) -> Vec<NetworkStatsSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }
}

impl PoolStore for MemoryStore {
    fn create_account(&self, account: &PoolAccount) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let key = account.address.as_str().to_string();
        if accounts.contains_key(&key) {
            return Err(StoreError::Duplicate(key));
        }
        accounts.insert(key, account.clone());
        Ok(())
    }

    fn get_account(&self, address: &AccountAddress) -> Result<PoolAccount, StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .get(address.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(address.to_string()))
    }

    fn accounts_by_status(
        &self,
        chain: &ChainId,
        status: AccountStatus,
    ) -> Result<Vec<PoolAccount>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        let mut matching: Vec<PoolAccount> = accounts
            .values()
            .filter(|a| a.chain_id == *chain && a.status == status)
            .cloned()
            .collect();
        // Oldest first, address as the tie-breaker for determinism.
        matching.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.address.cmp(&b.address))
        });
        Ok(matching)
    }

    fn transition_status(
        &self,
        address: &AccountAddress,
        from: AccountStatus,
        to: AccountStatus,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(address.as_str())
            .ok_or_else(|| StoreError::NotFound(address.to_string()))?;
        if account.status != from {
            return Err(StoreError::StatusConflict {
                address: address.to_string(),
                expected: from,
                actual: account.status,
            });
        }
        account.status = to;
        Ok(())
    }

    fn remove_account(&self, address: &AccountAddress) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .remove(address.as_str())
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(address.to_string()))
    }

    fn try_lease(&self, address: &AccountAddress) -> Result<bool, StoreError> {
        Ok(self
            .leases
            .lock()
            .unwrap()
            .insert(address.as_str().to_string()))
    }

    fn release_lease(&self, address: &AccountAddress) -> Result<(), StoreError> {
        self.leases.lock().unwrap().remove(address.as_str());
        Ok(())
    }
}

impl StatsStore for MemoryStore {
    fn append_snapshot(&self, snapshot: &NetworkStatsSnapshot) -> Result<(), StoreError> {
        let mut snapshots = self.snapshots.lock().unwrap();
        if let Some(latest) = snapshots.last() {
            if snapshot.created_at <= latest.created_at {
                return Err(StoreError::NonMonotonicSnapshot {
                    latest: latest.created_at.as_secs(),
                    attempted: snapshot.created_at.as_secs(),
                });
            }
        }
        snapshots.push(snapshot.clone());
        Ok(())
    }

    fn latest_snapshot(&self) -> Result<Option<NetworkStatsSnapshot>, StoreError> {
        Ok(self.snapshots.lock().unwrap().last().cloned())
    }

    fn snapshot_count(&self) -> Result<u64, StoreError> {
        Ok(self.snapshots.lock().unwrap().len() as u64)
    }

    fn node_count(&self, chain: &ChainId) -> Result<Option<ChainNodeCount>, StoreError> {
        Ok(self
            .node_counts
            .lock()
            .unwrap()
            .get(chain.as_str())
            .cloned())
    }

    fn upsert_node_count(&self, count: &ChainNodeCount) -> Result<(), StoreError> {
        self.node_counts
            .lock()
            .unwrap()
            .insert(count.chain_id.as_str().to_string(), count.clone());
        Ok(())
    }

    fn all_node_counts(&self) -> Result<Vec<ChainNodeCount>, StoreError> {
        let mut counts: Vec<ChainNodeCount> =
            self.node_counts.lock().unwrap().values().cloned().collect();
        counts.sort_by(|a, b| a.chain_id.cmp(&b.chain_id));
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keeper_types::{
        AatCredential, PrivateKey, PublicKey, Timestamp, TokenAmount,
    };

    fn account(chain: &str, addr: &str, status: AccountStatus, created: u64) -> PoolAccount {
        let public_key = PublicKey([1u8; 32]);
        PoolAccount {
            chain_id: ChainId::new(chain),
            address: AccountAddress::new(addr),
            public_key: public_key.clone(),
            private_key: PrivateKey([2u8; 32]),
            passphrase: "test".to_string(),
            status,
            signed_aat: AatCredential {
                version: "0.0.1".to_string(),
                app_public_key: public_key.clone(),
                client_public_key: public_key,
                signature: String::new(),
            },
            created_at: Timestamp::new(created),
        }
    }

    fn addr(s: &str) -> AccountAddress {
        AccountAddress::new(s)
    }

    #[test]
    fn create_and_get_account() {
        let store = MemoryStore::new();
        store
            .create_account(&account("0021", "aa", AccountStatus::Unstaked, 1))
            .unwrap();
        let fetched = store.get_account(&addr("aa")).unwrap();
        assert_eq!(fetched.status, AccountStatus::Unstaked);
    }

    #[test]
    fn duplicate_address_is_rejected() {
        let store = MemoryStore::new();
        let acct = account("0021", "aa", AccountStatus::Unstaked, 1);
        store.create_account(&acct).unwrap();
        assert!(matches!(
            store.create_account(&acct),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn accounts_by_status_filters_chain_and_status_oldest_first() {
        let store = MemoryStore::new();
        store
            .create_account(&account("0021", "young", AccountStatus::Staked, 30))
            .unwrap();
        store
            .create_account(&account("0021", "old", AccountStatus::Staked, 10))
            .unwrap();
        store
            .create_account(&account("0021", "other", AccountStatus::Unstaked, 5))
            .unwrap();
        store
            .create_account(&account("0009", "wrongchain", AccountStatus::Staked, 1))
            .unwrap();

        let staked = store
            .accounts_by_status(&ChainId::new("0021"), AccountStatus::Staked)
            .unwrap();
        let addresses: Vec<&str> = staked.iter().map(|a| a.address.as_str()).collect();
        assert_eq!(addresses, vec!["old", "young"]);
    }

    #[test]
    fn pooled_count_excludes_unstaking() {
        let store = MemoryStore::new();
        store
            .create_account(&account("0021", "a", AccountStatus::Unstaked, 1))
            .unwrap();
        store
            .create_account(&account("0021", "b", AccountStatus::Staked, 2))
            .unwrap();
        store
            .create_account(&account("0021", "c", AccountStatus::Unstaking, 3))
            .unwrap();
        assert_eq!(store.pooled_count(&ChainId::new("0021")).unwrap(), 2);
    }

    #[test]
    fn transition_status_is_compare_and_swap() {
        let store = MemoryStore::new();
        store
            .create_account(&account("0021", "aa", AccountStatus::Unstaked, 1))
            .unwrap();

        store
            .transition_status(&addr("aa"), AccountStatus::Unstaked, AccountStatus::Staked)
            .unwrap();

        // Second identical transition sees Staked, not Unstaked.
        let err = store
            .transition_status(&addr("aa"), AccountStatus::Unstaked, AccountStatus::Staked)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::StatusConflict {
                expected: AccountStatus::Unstaked,
                actual: AccountStatus::Staked,
                ..
            }
        ));
    }

    #[test]
    fn lease_is_exclusive_until_released() {
        let store = MemoryStore::new();
        assert!(store.try_lease(&addr("aa")).unwrap());
        assert!(!store.try_lease(&addr("aa")).unwrap());
        store.release_lease(&addr("aa")).unwrap();
        assert!(store.try_lease(&addr("aa")).unwrap());
    }

    #[test]
    fn snapshot_append_enforces_monotonic_created_at() {
        let store = MemoryStore::new();
        let snapshot = |secs| NetworkStatsSnapshot {
            nodes_staked: 1,
            apps_staked: 1,
            tokens_staked: TokenAmount::new(100),
            created_at: Timestamp::new(secs),
        };

        store.append_snapshot(&snapshot(100)).unwrap();
        store.append_snapshot(&snapshot(200)).unwrap();

        let err = store.append_snapshot(&snapshot(200)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NonMonotonicSnapshot {
                latest: 200,
                attempted: 200
            }
        ));
        assert_eq!(store.snapshot_count().unwrap(), 2);
    }

    #[test]
    fn node_count_upsert_replaces_by_key() {
        let store = MemoryStore::new();
        let chain = ChainId::new("0021");
        store
            .upsert_node_count(&ChainNodeCount {
                chain_id: chain.clone(),
                node_count: 5,
            })
            .unwrap();
        store
            .upsert_node_count(&ChainNodeCount {
                chain_id: chain.clone(),
                node_count: 9,
            })
            .unwrap();

        assert_eq!(store.node_count(&chain).unwrap().unwrap().node_count, 9);
        assert_eq!(store.all_node_counts().unwrap().len(), 1);
    }

    #[test]
    fn remove_account_deletes_the_record() {
        let store = MemoryStore::new();
        store
            .create_account(&account("0021", "aa", AccountStatus::Unstaking, 1))
            .unwrap();
        store.remove_account(&addr("aa")).unwrap();
        assert!(store.get_account(&addr("aa")).is_err());
        assert!(matches!(
            store.remove_account(&addr("aa")),
            Err(StoreError::NotFound(_))
        ));
    }
}
