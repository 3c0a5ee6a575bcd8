//! Argon2id password hashing.
//!
//! Hashing is CPU bound, so both functions run on the blocking thread pool.

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString},
};
use digibank_domain::PasswordHash;
use rand::Rng;
use tokio::task;

use crate::error::{DigibankEngineError, Result};

const SALT_LEN: usize = 16;

/// Hashes `password` into a PHC string with a fresh random salt.
pub(crate) async fn hash_password(password: String) -> Result<PasswordHash> {
    task::spawn_blocking(move || {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill(&mut salt);

        let salt = SaltString::encode_b64(&salt).map_err(credential_error)?;

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| PasswordHash::new(phc.to_string()))
            .map_err(credential_error)
    })
    .await?
}

/// Returns whether `password` matches `hash`.
///
/// A hash that does not parse is reported as an error, not as a mismatch.
pub(crate) async fn verify_password(hash: PasswordHash, password: String) -> Result<bool> {
    task::spawn_blocking(move || {
        let parsed = password_hash::PasswordHash::new(hash.as_str()).map_err(credential_error)?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(credential_error(err)),
        }
    })
    .await?
}

fn credential_error(err: password_hash::Error) -> DigibankEngineError {
    DigibankEngineError::credential(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_verify_only_the_original_password() {
        let hash = hash_password("correct horse".to_owned()).await.unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(verify_password(hash.clone(), "correct horse".to_owned()).await.unwrap());
        assert!(!verify_password(hash, "battery staple".to_owned()).await.unwrap());
    }

    #[tokio::test]
    async fn salts_differ_between_hashes() {
        let first = hash_password("same".to_owned()).await.unwrap();
        let second = hash_password("same".to_owned()).await.unwrap();

        assert_ne!(first.as_str(), second.as_str());
    }
}
