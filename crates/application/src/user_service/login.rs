use super::*;

impl UserService {
    /// Authenticates a user with email and password.
    ///
    /// Returns `AuthOutcome::Failed` for an unknown email, a malformed email
    /// or a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let Ok(email) = EmailAddress::new(email) else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let Some(record) = self.user_repository.find_by_email(&email).await? else {
            // Always hash so unknown accounts take as long as known ones.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, &record.password_hash)?;

        if !password_valid {
            return Ok(AuthOutcome::Failed);
        }

        Ok(AuthOutcome::Authenticated(record.user))
    }
}
