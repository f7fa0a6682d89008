//! Pool account lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a pooled application account.
///
/// Accounts progress Unstaked → Staked → Unstaking → removed. An account
/// stuck in Unstaking (an unstake transaction that never confirms) is parked:
/// it counts toward nothing and is never staked again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Generated and persisted, not yet staked on the network.
    Unstaked,
    /// Stake transaction confirmed; the account is serving relays.
    Staked,
    /// Unstake transaction submitted; waiting for the network to release it.
    Unstaking,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unstaked => "unstaked",
            Self::Staked => "staked",
            Self::Unstaking => "unstaking",
        }
    }

    /// Whether this status counts toward the pool's capacity target.
    /// Fill tops the pool up until Unstaked + Staked reaches capacity;
    /// Unstaking accounts are already on their way out.
    pub fn counts_toward_capacity(&self) -> bool {
        matches!(self, Self::Unstaked | Self::Staked)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_counting_excludes_unstaking() {
        assert!(AccountStatus::Unstaked.counts_toward_capacity());
        assert!(AccountStatus::Staked.counts_toward_capacity());
        assert!(!AccountStatus::Unstaking.counts_toward_capacity());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&AccountStatus::Unstaking).unwrap();
        assert_eq!(json, "\"unstaking\"");
    }
}
