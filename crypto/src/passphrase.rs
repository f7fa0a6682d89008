//! Keystore passphrase generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Entropy bytes per passphrase.
const PASSPHRASE_BYTES: usize = 32;

/// Generate a random hex passphrase for an account's encrypted keystore.
pub fn generate_passphrase() -> String {
    let mut bytes = [0u8; PASSPHRASE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passphrases_are_64_hex_chars() {
        let p = generate_passphrase();
        assert_eq!(p.len(), 64);
        assert!(p.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn passphrases_are_unique() {
        assert_ne!(generate_passphrase(), generate_passphrase());
    }
}
