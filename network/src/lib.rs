//! Relay network client capability.
//!
//! The blockchain network is an external collaborator, treated as unreliable
//! and possibly slow: every request carries its own timeout, and an empty
//! result from a critical query is an error, never "zero entities" — an
//! empty list is indistinguishable from an outage on the caller's side.
//!
//! [`NetworkClient`] is the object-safe seam the workers depend on;
//! [`RpcNetworkClient`] is the HTTP implementation. Tests substitute the
//! nullable client from `keeper-nullables`.

pub mod client;
pub mod error;
pub mod rpc;

pub use client::{NetworkClient, StakeOrder, StakedApp, StakedNode, TxReceipt};
pub use error::NetworkError;
pub use rpc::RpcNetworkClient;
