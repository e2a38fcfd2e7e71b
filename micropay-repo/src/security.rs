//! Password hashing for account records.
//!
//! Stored format: `<salt-hex>$<sha256(salt || password)-hex>`.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;

fn digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    format!("{}${}", hex::encode(salt), digest(&salt, password))
}

/// Verifies a password against a stored hash using constant-time comparison.
///
/// No endpoint authenticates yet; this is the check that a stored value
/// matches the `<salt>$<digest>` format `hash_password` writes. Malformed
/// stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, hash)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };

    digest(&salt, password)
        .as_bytes()
        .ct_eq(hash.as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("password");

        let (salt, digest) = hash.split_once('$').unwrap();
        assert_eq!(salt.len(), SALT_LEN * 2);
        assert_eq!(digest.len(), 64);
        assert!(!hash.contains("password"));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        assert_ne!(hash_password("password"), hash_password("password"));
    }

    #[test]
    fn test_password_verification() {
        let hash = hash_password("password");

        assert!(verify_password("password", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("password", "password"));
        assert!(!verify_password("password", "zz$abc"));
    }
}
