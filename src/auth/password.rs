//! Salted password hashing with Argon2id
//!
//! Digests are PHC strings, so the algorithm parameters and the random salt
//! travel with the hash and verification needs nothing else.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use std::sync::OnceLock;

use crate::error::{Result, StockError};

/// Hashes a plaintext password with a fresh random salt
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StockError::AuthError(format!("Failed to hash password: {}", e)))
}

/// Checks a plaintext password against a stored digest.
///
/// A digest that cannot be parsed never matches.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    let parsed = match PasswordHash::new(digest) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("Stored password digest is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Verifies against the stored digest, or burns the same work on a dummy
/// digest when there is no user, so both failures take equally long.
pub fn verify_or_dummy(plaintext: &str, digest: Option<&str>) -> bool {
    match digest {
        Some(digest) => verify_password(plaintext, digest),
        None => {
            if let Some(dummy) = dummy_digest() {
                let _ = verify_password(plaintext, dummy);
            }
            false
        }
    }
}

fn dummy_digest() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("rusty-stock-timing-equaliser").ok())
        .as_deref()
}
