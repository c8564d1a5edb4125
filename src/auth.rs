//! Password hashing for protected links.
//!
//! Passwords are never stored or compared in plaintext: creation hashes
//! with Argon2id and a fresh salt, verification goes through the
//! password-hash API (which is not a naive string comparison).

use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a link password for storage.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Check a candidate password against a stored hash.
///
/// An unparseable stored hash is treated as a mismatch rather than an
/// error — the visitor can't do anything about it either way.
pub fn verify_password(stored_hash: &str, candidate: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("stored password hash is unparseable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("secret").unwrap();
        assert!(verify_password(&hash, "secret"));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("secret").unwrap();
        assert!(!verify_password(&hash, "Secret"));
        assert!(!verify_password(&hash, ""));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "secret"));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt per hash
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
    }
}
