use dishpicker_core::AppError;
use dishpicker_domain::validate_password;

use super::*;

impl UserService {
    /// Registers a new account with the `User` role.
    pub async fn register(&self, params: RegisterParams) -> AppResult<User> {
        let username = Username::new(params.username)?;
        let email = EmailAddress::new(params.email)?;
        validate_password(&params.password)?;

        let existing = self.user_repository.find_by_email(&email).await?;
        if existing.is_some() {
            // Keep timing in line with a successful registration.
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AppError::Conflict(
                "an account with this email address already exists".to_owned(),
            ));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        self.user_repository
            .create(NewUser {
                username,
                email,
                password_hash,
                role: Role::User,
            })
            .await
    }
}
