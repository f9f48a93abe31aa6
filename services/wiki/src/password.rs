//! Password hashing with Argon2

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use std::sync::OnceLock;
use tracing::error;

/// Hash a password into an Argon2 PHC string with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;

    Ok(password_hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// A malformed stored hash is reported as an error, a mismatch as `Ok(false)`.
pub fn verify_password(
    password: &str,
    password_hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(password_hash)?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash checked when the account has no usable one, computed on first use
fn placeholder_hash() -> Option<&'static str> {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| match hash_password("placeholder-password") {
            Ok(hash) => Some(hash),
            Err(e) => {
                error!("Failed to compute placeholder password hash: {}", e);
                None
            }
        })
        .as_deref()
}

/// Verify a login attempt.
///
/// Unknown accounts and accounts without a password are checked against a
/// placeholder hash, so every attempt pays one full Argon2 verification and
/// always fails.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> bool {
    let Some(stored_hash) = stored_hash else {
        if let Some(placeholder) = placeholder_hash() {
            let _ = verify_password(password, placeholder);
        }
        return false;
    };

    match verify_password(password, stored_hash) {
        Ok(matched) => matched,
        Err(e) => {
            error!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}
