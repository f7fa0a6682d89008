use keeper_types::AccountStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("status conflict on {address}: expected {expected}, found {actual}")]
    StatusConflict {
        address: String,
        expected: AccountStatus,
        actual: AccountStatus,
    },

    #[error("snapshot created_at {attempted} is not after the latest snapshot {latest}")]
    NonMonotonicSnapshot { latest: u64, attempted: u64 },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
