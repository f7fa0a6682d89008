//! Account address derivation from public keys.
//!
//! Address format: lowercase hex of the first 20 bytes of
//! SHA-256(public_key) — 40 characters, the relay network's account
//! address convention.

use keeper_types::{AccountAddress, PublicKey};
use sha2::{Digest, Sha256};

/// Number of hash bytes kept as the address.
const ADDRESS_BYTES: usize = 20;

/// Derive an account address from a public key.
pub fn derive_address(public_key: &PublicKey) -> AccountAddress {
    let digest = Sha256::digest(public_key.as_bytes());
    AccountAddress::new(hex::encode(&digest[..ADDRESS_BYTES]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;

    #[test]
    fn address_is_40_hex_chars() {
        let kp = keypair_from_seed(&[7u8; 32]);
        let address = derive_address(&kp.public);
        assert_eq!(address.as_str().len(), 40);
        assert!(address.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn derivation_is_deterministic() {
        let kp = keypair_from_seed(&[9u8; 32]);
        assert_eq!(derive_address(&kp.public), derive_address(&kp.public));
    }

    #[test]
    fn different_keys_get_different_addresses() {
        let a = keypair_from_seed(&[1u8; 32]);
        let b = keypair_from_seed(&[2u8; 32]);
        assert_ne!(derive_address(&a.public), derive_address(&b.public));
    }
}
