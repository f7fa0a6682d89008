//! Application authentication token — the delegation credential handed out
//! with a pooled account.
//!
//! The token delegates an application account's relay allowance to a client
//! key. It is issued once at account generation (see `keeper_crypto`) and
//! persisted alongside the account; this crate only defines the data shape.

use serde::{Deserialize, Serialize};

use crate::PublicKey;

/// A signed delegation credential for one application account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AatCredential {
    /// Credential format version.
    pub version: String,
    /// The application account's public key (the signer).
    pub app_public_key: PublicKey,
    /// The client key the relay allowance is delegated to.
    pub client_public_key: PublicKey,
    /// Hex-encoded Ed25519 signature over the credential body.
    pub signature: String,
}
