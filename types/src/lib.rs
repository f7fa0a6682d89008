//! Fundamental types for the keeper reconciliation workers.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: chain identifiers and the per-environment chain registry, token
//! amounts, timestamps, account lifecycle status, and key material.

pub mod aat;
pub mod address;
pub mod amount;
pub mod chain;
pub mod error;
pub mod keys;
pub mod status;
pub mod time;

pub use aat::AatCredential;
pub use address::AccountAddress;
pub use amount::TokenAmount;
pub use chain::{ChainConfig, ChainId, ChainRegistry, Environment, Ticker};
pub use error::TypesError;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use status::AccountStatus;
pub use time::Timestamp;
