//! Password hashing via bcrypt.

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Check a supplied password against a stored bcrypt hash.
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(stored_hash: &str, password: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, stored_hash)
        .map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}
