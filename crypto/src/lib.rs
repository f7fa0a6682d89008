//! Account identity generation for the pool.
//!
//! - **Ed25519** for application-account key pairs and AAT signing
//! - **SHA-256** for address derivation (first 20 bytes, hex-encoded)
//!
//! The pool reconciler calls [`generate_account_identity`] to mint a complete
//! ready-to-stake identity: key pair, address, passphrase, and a signed
//! delegation credential.

pub mod aat;
pub mod address;
pub mod error;
pub mod keys;
pub mod passphrase;

pub use aat::{aat_signing_bytes, issue_aat, verify_aat, AAT_VERSION};
pub use address::derive_address;
pub use error::CryptoError;
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use passphrase::generate_passphrase;

use keeper_types::{AatCredential, AccountAddress, KeyPair};

/// A freshly generated, ready-to-stake application identity.
pub struct AccountIdentity {
    pub keypair: KeyPair,
    pub address: AccountAddress,
    pub passphrase: String,
    pub signed_aat: AatCredential,
}

/// The key-generation capability the pool reconciler depends on.
///
/// Production uses [`SystemAccountSource`]; tests substitute a deterministic
/// source (see `keeper-nullables`).
pub trait AccountSource: Send + Sync {
    fn generate_account(&self) -> Result<AccountIdentity, CryptoError>;
}

/// OS-randomness-backed account source.
#[derive(Default)]
pub struct SystemAccountSource;

impl AccountSource for SystemAccountSource {
    fn generate_account(&self) -> Result<AccountIdentity, CryptoError> {
        generate_account_identity()
    }
}

/// Generate a complete application identity: key pair, derived address,
/// random passphrase, and a self-delegated AAT.
pub fn generate_account_identity() -> Result<AccountIdentity, CryptoError> {
    let keypair = generate_keypair();
    let address = derive_address(&keypair.public);
    let passphrase = generate_passphrase();
    // The pool delegates each account to its own key; a dashboard re-issues
    // the AAT for the end user's client key when the account is handed out.
    let signed_aat = issue_aat(&keypair, &keypair.public)?;
    Ok(AccountIdentity {
        keypair,
        address,
        passphrase,
        signed_aat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_identity_is_internally_consistent() {
        let identity = generate_account_identity().unwrap();
        assert_eq!(identity.address, derive_address(&identity.keypair.public));
        assert_eq!(
            identity.signed_aat.app_public_key,
            identity.keypair.public
        );
        assert!(verify_aat(&identity.signed_aat).unwrap());
    }

    #[test]
    fn identities_are_unique() {
        let a = generate_account_identity().unwrap();
        let b = generate_account_identity().unwrap();
        assert_ne!(a.address, b.address);
        assert_ne!(a.passphrase, b.passphrase);
    }
}
