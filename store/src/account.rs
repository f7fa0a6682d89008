//! Pool account record and storage trait.

use serde::{Deserialize, Serialize};

use keeper_types::{
    AatCredential, AccountAddress, AccountStatus, ChainId, PrivateKey, PublicKey, Timestamp,
};

use crate::StoreError;

/// A pre-generated application account held in reserve for one chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolAccount {
    /// Chain this account is reserved for.
    pub chain_id: ChainId,
    /// Account address (derived from the public key).
    pub address: AccountAddress,
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
    /// Keystore passphrase handed out with the account.
    pub passphrase: String,
    /// Lifecycle status (Unstaked → Staked → Unstaking → removed).
    pub status: AccountStatus,
    /// Signed delegation credential issued at generation time.
    pub signed_aat: AatCredential,
    /// When the account was generated; decommission unstakes oldest first.
    pub created_at: Timestamp,
}

/// Trait for pool account storage operations.
///
/// Implementations must make [`transition_status`](Self::transition_status)
/// and the lease pair atomic with respect to each other — they are the only
/// mutation paths the workers use.
pub trait PoolStore: Send + Sync {
    /// Persist a newly generated account. Fails with [`StoreError::Duplicate`]
    /// if the address already exists.
    fn create_account(&self, account: &PoolAccount) -> Result<(), StoreError>;

    fn get_account(&self, address: &AccountAddress) -> Result<PoolAccount, StoreError>;

    /// All accounts for a chain with the given status, oldest first.
    fn accounts_by_status(
        &self,
        chain: &ChainId,
        status: AccountStatus,
    ) -> Result<Vec<PoolAccount>, StoreError>;

    fn count_by_status(&self, chain: &ChainId, status: AccountStatus) -> Result<u64, StoreError> {
        self.accounts_by_status(chain, status)
            .map(|v| v.len() as u64)
    }

    /// Accounts counting toward the capacity target (Unstaked + Staked).
    fn pooled_count(&self, chain: &ChainId) -> Result<u64, StoreError> {
        let unstaked = self.count_by_status(chain, AccountStatus::Unstaked)?;
        let staked = self.count_by_status(chain, AccountStatus::Staked)?;
        Ok(unstaked + staked)
    }

    /// Compare-and-swap status transition. Fails with
    /// [`StoreError::StatusConflict`] if the account's current status is not
    /// `from`; the caller must treat that as "someone else got here first".
    fn transition_status(
        &self,
        address: &AccountAddress,
        from: AccountStatus,
        to: AccountStatus,
    ) -> Result<(), StoreError>;

    /// Remove an account whose unstake has confirmed.
    fn remove_account(&self, address: &AccountAddress) -> Result<(), StoreError>;

    /// Acquire the per-account submission lease. Returns `false` if another
    /// holder has it; the caller must skip the account, not wait.
    fn try_lease(&self, address: &AccountAddress) -> Result<bool, StoreError>;

    /// Release a lease acquired with [`try_lease`](Self::try_lease).
    /// Releasing an unheld lease is a no-op.
    fn release_lease(&self, address: &AccountAddress) -> Result<(), StoreError>;
}
