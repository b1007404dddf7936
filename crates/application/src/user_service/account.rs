use dishpicker_core::AppError;
use dishpicker_domain::{Action, Principal, ResourceKind, validate_password};

use super::*;

impl UserService {
    /// Lists every account. Administrators only.
    pub async fn list_users(&self, principal: Principal) -> AppResult<Vec<User>> {
        self.authorization
            .require_collection(principal, Action::Read, ResourceKind::User)?;
        self.authorization.require_admin(principal)?;

        self.user_repository.list().await
    }

    /// Returns one account.
    pub async fn get_user(&self, principal: Principal, user_id: UserId) -> AppResult<User> {
        let user = self.load(user_id).await?;
        self.authorization.require_on(principal, Action::Read, &user)?;

        Ok(user)
    }

    /// Applies a partial update to an account. The role cannot be changed.
    pub async fn update_user(
        &self,
        principal: Principal,
        user_id: UserId,
        params: UpdateUserParams,
    ) -> AppResult<User> {
        let user = self.load(user_id).await?;
        self.authorization
            .require_on(principal, Action::Update, &user)?;

        let username = params.username.map(Username::new).transpose()?;
        let email = params.email.map(EmailAddress::new).transpose()?;
        let password_hash = match params.password {
            Some(password) => {
                validate_password(&password)?;
                Some(self.password_hasher.hash_password(&password)?)
            }
            None => None,
        };

        if let Some(email) = &email
            && email != user.email()
            && self.user_repository.find_by_email(email).await?.is_some()
        {
            return Err(AppError::Conflict(
                "an account with this email address already exists".to_owned(),
            ));
        }

        self.user_repository
            .update(
                user_id,
                UserChanges {
                    username,
                    email,
                    password_hash,
                },
            )
            .await
    }

    /// Deletes an account together with its dishes.
    pub async fn delete_user(&self, principal: Principal, user_id: UserId) -> AppResult<()> {
        let user = self.load(user_id).await?;
        self.authorization
            .require_on(principal, Action::Delete, &user)?;

        self.user_repository.delete(user_id).await
    }

    /// Replaces the stored profile image path of an account.
    pub async fn set_user_image(
        &self,
        principal: Principal,
        user_id: UserId,
        path: &str,
    ) -> AppResult<User> {
        let user = self.load(user_id).await?;
        self.authorization
            .require_on(principal, Action::Update, &user)?;

        let path = path.trim();
        if path.is_empty() {
            return Err(AppError::Validation(
                "image path must not be empty".to_owned(),
            ));
        }

        self.user_repository
            .set_profile_image(user_id, Some(path))
            .await
    }

    /// Clears the stored profile image path of an account.
    pub async fn delete_user_image(&self, principal: Principal, user_id: UserId) -> AppResult<User> {
        let user = self.load(user_id).await?;
        self.authorization
            .require_on(principal, Action::Delete, &user)?;

        if user.profile_image_path().is_none() {
            return Ok(user);
        }

        self.user_repository.set_profile_image(user_id, None).await
    }

    async fn load(&self, user_id: UserId) -> AppResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))
    }
}
