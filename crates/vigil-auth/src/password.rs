//! Salted one-way hashing for client secrets and user passwords.
//!
//! Secrets and passwords are stored as Argon2id hashes in PHC string
//! format and are never compared in plaintext. A mismatch is reported as
//! `false`; only a malformed stored hash is an error, since that points
//! at corrupted provisioning data rather than a wrong guess.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::AuthResult;
use crate::error::AuthError;

/// Hashes a plaintext secret or password with a fresh random salt.
///
/// # Errors
///
/// Returns an `Internal` error if hashing fails.
pub fn hash_password(plaintext: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verifies a candidate password against a stored hash.
///
/// Returns `false` on mismatch; a wrong password is never an error.
///
/// # Errors
///
/// Returns an `Internal` error if the stored hash cannot be parsed.
pub fn verify_password(stored_hash: &str, candidate: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::internal(format!("malformed stored hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}

/// Verifies a candidate client secret against a stored hash.
///
/// Client secrets use the same hashing scheme as user passwords.
///
/// # Errors
///
/// Returns an `Internal` error if the stored hash cannot be parsed.
pub fn verify_client_secret(stored_hash: &str, candidate: &str) -> AuthResult<bool> {
    verify_password(stored_hash, candidate)
}
