use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use crate::{ClientError, ClientResult};

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn hash_password(password: &str) -> ClientResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| ClientError::internal_password_hash(&error.to_string()))
}

/// `Ok(false)` for a wrong password; `Err` only when the stored hash is unusable.
pub fn verify_password(candidate: &str, stored_hash: &str) -> ClientResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|error| ClientError::internal_password_hash(&error.to_string()))?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(other) => Err(ClientError::internal_password_hash(&other.to_string())),
    }
}
