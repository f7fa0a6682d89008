//! Tagged job errors.
//!
//! Every failure a job can surface carries a [`JobErrorKind`] so callers
//! (tests, metrics) assert on the failure class instead of string-matching
//! log output. Two of the kinds never abort a run: `Entity` and
//! `UnknownChain` failures are recovered locally and only appear inside run
//! reports.

use keeper_network::NetworkError;
use keeper_store::StoreError;
use keeper_types::ChainId;
use thiserror::Error;

/// Failure classes per the reconciliation error taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobErrorKind {
    /// Fatal at startup; the workers refuse to construct.
    Config,
    /// Transient network failure; the run aborts and the next firing retries.
    Network,
    /// Storage failure; the run aborts and the next firing retries.
    Store,
    /// A critical query returned no entities — indistinguishable from an
    /// outage, so nothing is persisted. Transient; retried next firing.
    EmptyNetworkResult,
    /// One account's generation or transaction failed; recovered locally.
    Entity,
    /// Node data referenced a chain id outside the registry; recovered
    /// locally.
    UnknownChain,
    /// Arithmetic or invariant violation inside an aggregation.
    Internal,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("empty {what} result from the network")]
    EmptyNetworkResult { what: &'static str },

    #[error("account {address}: {reason}")]
    Entity { address: String, reason: String },

    #[error("unregistered chain id in node data: {chain}")]
    UnknownChain { chain: ChainId },

    #[error("internal error: {0}")]
    Internal(String),
}

impl JobError {
    /// The failure class, for assertions and metrics.
    pub fn kind(&self) -> JobErrorKind {
        match self {
            Self::Config(_) => JobErrorKind::Config,
            Self::Network(_) => JobErrorKind::Network,
            Self::Store(_) => JobErrorKind::Store,
            Self::EmptyNetworkResult { .. } => JobErrorKind::EmptyNetworkResult,
            Self::Entity { .. } => JobErrorKind::Entity,
            Self::UnknownChain { .. } => JobErrorKind::UnknownChain,
            Self::Internal(_) => JobErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        let err = JobError::Config("bad".to_string());
        assert_eq!(err.kind(), JobErrorKind::Config);

        let err = JobError::EmptyNetworkResult { what: "staked nodes" };
        assert_eq!(err.kind(), JobErrorKind::EmptyNetworkResult);

        let err = JobError::Entity {
            address: "aa".to_string(),
            reason: "rejected".to_string(),
        };
        assert_eq!(err.kind(), JobErrorKind::Entity);
    }

    #[test]
    fn store_errors_convert_with_kind() {
        let err: JobError = StoreError::NotFound("x".to_string()).into();
        assert_eq!(err.kind(), JobErrorKind::Store);
    }
}
