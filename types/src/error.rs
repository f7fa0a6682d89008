//! Error type for the foundation crate.

use thiserror::Error;

/// Errors arising from type construction and parsing.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("unknown environment: {0} (expected \"development\" or \"production\")")]
    UnknownEnvironment(String),

    #[error("invalid token amount: {0}")]
    InvalidAmount(String),

    #[error("invalid key material: {0}")]
    InvalidKey(String),
}
