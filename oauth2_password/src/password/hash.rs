//! Argon2id password hashing.
//!
//! Hashing and verification are CPU bound and run on the blocking thread pool.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::errors::PasswordError;

/// Verified in place of a missing hash so unknown accounts cost the same as wrong passwords.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$9QsJRKgzJkKaOUvlp7gl2Q$qmE3qIFBNJ6nZYbLYXEI2uo0zZc7T0Q8LU1ZsqsZ3QE";

/// Hash a plaintext password into a PHC string with a fresh random salt.
pub(crate) async fn hash_password(password: &str) -> Result<String, PasswordError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || -> Result<_, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    })
    .await?
}

/// Check a plaintext password against a stored hash.
///
/// `None` stands for an account that does not exist or has no password. The dummy hash
/// is verified anyway and the result is always `false`.
pub(crate) async fn verify_password(
    password: &str,
    stored_hash: Option<&str>,
) -> Result<bool, PasswordError> {
    let password = password.to_owned();
    let (known, stored_hash) = match stored_hash {
        Some(hash) => (true, hash.to_owned()),
        None => (false, DUMMY_HASH.to_owned()),
    };

    tokio::task::spawn_blocking(move || -> Result<_, PasswordError> {
        let parsed = match PasswordHash::new(&stored_hash) {
            Ok(parsed) => parsed,
            Err(e) if known => return Err(PasswordError::MalformedHash(e.to_string())),
            Err(_) => return Ok(false),
        };
        let valid = Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        Ok(known && valid)
    })
    .await?
}
