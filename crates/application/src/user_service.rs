//! User account ports and application service.
//!
//! Owns registration, password login and the account operations that sit
//! behind the capability rules. Login failures share one generic outcome so
//! that callers cannot tell unknown emails from wrong passwords.

use std::sync::Arc;

use async_trait::async_trait;

use dishpicker_core::AppResult;
use dishpicker_domain::{EmailAddress, Role, User, UserId, Username};

use crate::AuthorizationService;

mod account;
mod login;
mod registration;


// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record including the stored credential.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Account projection.
    pub user: User,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Values for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Public username.
    pub username: Username,
    /// Unique email address.
    pub email: EmailAddress,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
}

/// Partial account update. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// New username.
    pub username: Option<Username>,
    /// New email address.
    pub email: Option<EmailAddress>,
    /// New password hash.
    pub password_hash: Option<String>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user and credential by email.
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>>;

    /// Finds a user by id.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;

    /// Lists all users ordered by id.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Creates a user. Fails with `Conflict` when the email is taken.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Applies a partial update and returns the updated user.
    async fn update(&self, user_id: UserId, changes: UserChanges) -> AppResult<User>;

    /// Replaces or clears the stored profile image path.
    async fn set_profile_image(&self, user_id: UserId, path: Option<&str>) -> AppResult<User>;

    /// Deletes a user and everything the account owns.
    async fn delete(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    /// Must run in constant time regardless of validity.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Authentication outcome
// ---------------------------------------------------------------------------

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Authentication succeeded. Session can be established.
    Authenticated(User),
    /// Authentication failed. Generic message prevents enumeration.
    Failed,
}

/// Message returned for every failed login.
pub const LOGIN_FAILED_MESSAGE: &str = "invalid email or password";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for user registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    /// Public username.
    pub username: String,
    /// Email address for the new account.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Parameters for a partial account update.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParams {
    /// New username.
    pub username: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for authentication and user accounts.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    authorization: AuthorizationService,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        authorization: AuthorizationService,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            authorization,
        }
    }

    /// Returns a user by id without an authorization check.
    ///
    /// Used by the session layer to resolve the current principal.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        self.user_repository.find_by_id(user_id).await
    }
}
