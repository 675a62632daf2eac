//! Opaque token generation and hashing.

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use rand::{rngs::OsRng, RngCore};

use crate::AuthError;

/// Generates a cryptographically secure random token as a hex string.
///
/// # Arguments
///
/// * `byte_len` - Number of random bytes (output string will be 2x this length)
pub fn generate_token(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(&bytes)
}

/// Hashes a token with Argon2id, returning the PHC string.
pub fn hash_token(token: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(token.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Configuration(format!("failed to hash token: {e}")))
}
