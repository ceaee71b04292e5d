// Password hashing utilities
// The admin password is stored only as a bcrypt hash (ADMIN_PASSWORD_HASH)

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hashes a password using bcrypt
///
/// Used to produce the value for `ADMIN_PASSWORD_HASH`.
///
/// # Example
/// ```
/// use cooking_assistant_api::auth::password::hash_password;
///
/// let hash = hash_password("my_password").expect("valid hash");
/// assert!(hash.starts_with("$2"));
/// ```
pub fn hash_password(password: &str) -> Result<String, String> {
    hash(password, DEFAULT_COST).map_err(|e| e.to_string())
}

/// Verifies a password against a bcrypt hash
///
/// # Returns
/// * `Ok(bool)` - True if password matches, false otherwise
/// * `Err(String)` - If the hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}
