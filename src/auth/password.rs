//! Argon2id password hashing
//!
//! Both operations are CPU-heavy and run on the blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Hash a password with a fresh random salt, returning the PHC string
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
    })
    .await
    .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))?
}

/// Check a password against a stored PHC string
///
/// Unparsable hashes verify as `false`.
pub async fn verify_password(password: &str, password_hash: &str) -> bool {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();

    tokio::task::spawn_blocking(move || {
        let Ok(parsed) = PasswordHash::new(&password_hash) else {
            tracing::error!("stored password hash could not be parsed");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("correct horse").await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("correct horse"));
        assert!(verify_password("correct horse", &hash).await);
        assert!(!verify_password("battery staple", &hash).await);
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let first = hash_password("same").await.unwrap();
        let second = hash_password("same").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_garbage_hash_does_not_verify() {
        assert!(!verify_password("anything", "not-a-phc-string").await);
    }
}
