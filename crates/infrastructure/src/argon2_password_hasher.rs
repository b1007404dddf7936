//! Argon2id password hasher implementation.
//!
//! Uses OWASP-recommended Argon2id parameters:
//! m=19456 (19 MiB), t=2, p=1.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use dishpicker_application::PasswordHasher as PasswordHasherPort;
use dishpicker_core::{AppError, AppResult};

/// Argon2id password hasher for account credentials.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a new Argon2id hasher with recommended parameters.
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(19456, 2, 1, None).unwrap_or_else(|_| Params::default());

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash).map_err(|error| {
            AppError::Internal(format!("failed to parse password hash: {error}"))
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use dishpicker_application::PasswordHasher as PasswordHasherPort;
    use dishpicker_core::AppResult;

    use super::Argon2PasswordHasher;

    #[test]
    fn seeded_password_verifies_and_wrong_one_does_not() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash_password("Miau.6")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("Miau.6", &hash)?);
        assert!(!hasher.verify_password("miau.6", &hash)?);
        Ok(())
    }

    #[test]
    fn malformed_hash_is_an_internal_error() {
        let hasher = Argon2PasswordHasher::new();
        assert!(hasher.verify_password("Miau.6", "not-a-hash").is_err());
    }
}
