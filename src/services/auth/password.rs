//! Password hashing for registration and login.
//!
//! Hashes are Argon2id PHC strings (salt and parameters included), so they can
//! be verified without any extra configuration.
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    Params(argon2::Error),
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

// Verified against when the username is unknown, so both login failure paths do the same work.
pub const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$\
    gZiV/M1gPc22ElAH/Jh1Hw$\
    CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(15000, 2, 1, None).map_err(PasswordError::Params)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Compute the PHC-encoded Argon2id hash of `password`.
///
/// CPU-bound: call it from `spawn_blocking`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?;

    Ok(hash.to_string())
}

/// `false` for a wrong password and for an unparsable stored hash.
pub fn verify_password(expected_hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(expected_hash) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("sekret").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "sekret"));
        assert!(!verify_password(&hash, "wrong"));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password("sekret").unwrap();
        let b = hash_password("sekret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("plaintext", "plaintext"));
    }

    #[test]
    fn dummy_hash_is_parsable() {
        assert!(PasswordHash::new(DUMMY_PASSWORD_HASH).is_ok());
    }
}
