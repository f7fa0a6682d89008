//! Application authentication token issuance and verification.
//!
//! The signed message is SHA-256 over `version || app_pub || client_pub`,
//! signed with the application account's key.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use keeper_types::{AatCredential, KeyPair, PublicKey};
use sha2::{Digest, Sha256};

use crate::CryptoError;

/// Current credential format version.
pub const AAT_VERSION: &str = "0.0.1";

/// The canonical byte string an AAT signature covers.
pub fn aat_signing_bytes(version: &str, app: &PublicKey, client: &PublicKey) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(version.as_bytes());
    hasher.update(app.as_bytes());
    hasher.update(client.as_bytes());
    hasher.finalize().into()
}

/// Issue a signed AAT delegating `app`'s relay allowance to `client_public_key`.
pub fn issue_aat(app: &KeyPair, client_public_key: &PublicKey) -> Result<AatCredential, CryptoError> {
    let signing_key = SigningKey::from_bytes(app.private.as_bytes());
    let message = aat_signing_bytes(AAT_VERSION, &app.public, client_public_key);
    let signature = signing_key.sign(&message);
    Ok(AatCredential {
        version: AAT_VERSION.to_string(),
        app_public_key: app.public.clone(),
        client_public_key: client_public_key.clone(),
        signature: hex::encode(signature.to_bytes()),
    })
}

/// Verify an AAT's signature against its own app public key.
pub fn verify_aat(aat: &AatCredential) -> Result<bool, CryptoError> {
    let verifying_key = VerifyingKey::from_bytes(aat.app_public_key.as_bytes())
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    let signature_bytes: [u8; 64] = hex::decode(&aat.signature)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?
        .try_into()
        .map_err(|_| CryptoError::InvalidSignature("expected 64 bytes".to_string()))?;
    let signature = Signature::from_bytes(&signature_bytes);
    let message = aat_signing_bytes(&aat.version, &aat.app_public_key, &aat.client_public_key);
    Ok(verifying_key.verify(&message, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;

    #[test]
    fn issued_aat_verifies() {
        let app = keypair_from_seed(&[3u8; 32]);
        let client = keypair_from_seed(&[4u8; 32]);
        let aat = issue_aat(&app, &client.public).unwrap();
        assert_eq!(aat.version, AAT_VERSION);
        assert!(verify_aat(&aat).unwrap());
    }

    #[test]
    fn tampered_client_key_fails_verification() {
        let app = keypair_from_seed(&[3u8; 32]);
        let client = keypair_from_seed(&[4u8; 32]);
        let mut aat = issue_aat(&app, &client.public).unwrap();
        aat.client_public_key = keypair_from_seed(&[5u8; 32]).public;
        assert!(!verify_aat(&aat).unwrap());
    }

    #[test]
    fn garbage_signature_is_an_error_not_a_panic() {
        let app = keypair_from_seed(&[3u8; 32]);
        let mut aat = issue_aat(&app, &app.public).unwrap();
        aat.signature = "not-hex".to_string();
        assert!(verify_aat(&aat).is_err());
    }
}
