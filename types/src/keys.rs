//! Cryptographic key types for application-account identity.
//!
//! Pool accounts are persisted with their key material (the pool exists to
//! hand out ready-to-use accounts), so unlike a wallet both halves of the key
//! pair are serializable — as hex strings, the document-store convention.
//! The private key still zeroizes on drop and redacts its `Debug` output.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::TypesError;

/// A 32-byte Ed25519 public key, hex-encoded when serialized.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        decode_key_hex(s).map(Self)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 32-byte Ed25519 private key (secret scalar).
///
/// Key bytes are zeroized on drop; `Debug` never prints them.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

impl PrivateKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        decode_key_hex(s).map(Self)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl Serialize for PrivateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// An Ed25519 key pair (public + private).
///
/// Use `keeper_crypto::generate_keypair()` to construct key pairs.
/// This struct is intentionally just data.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

fn decode_key_hex(s: &str) -> Result<[u8; 32], TypesError> {
    let bytes = hex::decode(s).map_err(|e| TypesError::InvalidKey(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| TypesError::InvalidKey(format!("expected 32 bytes, got {}", s.len() / 2)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_hex_round_trip() {
        let key = PublicKey([7u8; 32]);
        let back = PublicKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let key = PrivateKey([9u8; 32]);
        assert_eq!(format!("{key:?}"), "PrivateKey(<redacted>)");
    }

    #[test]
    fn rejects_wrong_length_hex() {
        assert!(PublicKey::from_hex("abcd").is_err());
        assert!(PrivateKey::from_hex("").is_err());
    }

    #[test]
    fn rejects_invalid_hex() {
        let bad = "zz".repeat(32);
        assert!(PublicKey::from_hex(&bad).is_err());
    }
}
