//! User domain types and validation rules.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use dishpicker_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Maximum length of usernames and email addresses.
pub const USER_TEXT_MAX_LENGTH: usize = 42;

/// Minimum password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Maximum password length (protects against Argon2id DoS).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Unique identifier for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from its storage value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the storage value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Role assigned to every account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular account; acts on its own account and its own dishes.
    #[default]
    User,
    /// Administrator with full access to every resource.
    Admin,
}

impl Role {
    /// Returns the storage string for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated, lowercased email address.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.chars().count() > USER_TEXT_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "email address must not exceed {USER_TEXT_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Validated public username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(NonEmptyString);

impl Username {
    /// Creates a validated username.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::with_max_length(value, "username", USER_TEXT_MAX_LENGTH).map(Self)
    }

    /// Returns the username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validates a plaintext password.
///
/// Requires a lowercase letter, an uppercase letter, a digit and a special
/// character, with a length between [`PASSWORD_MIN_LENGTH`] and
/// [`PASSWORD_MAX_LENGTH`].
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if !(has_lowercase && has_uppercase && has_digit && has_special) {
        return Err(AppError::Validation(
            "password should contain at least one uppercase letter, one lowercase letter, one digit and a special character"
                .to_owned(),
        ));
    }

    Ok(())
}

/// Registered account as seen by the rest of the system. Credentials never
/// leave the user repository port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    role: Role,
    profile_image_path: Option<String>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user projection from validated parts.
    #[must_use]
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        role: Role,
        profile_image_path: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            role,
            profile_image_path,
            created_at,
        }
    }

    /// Returns the account id.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the stored profile image path, if any.
    #[must_use]
    pub fn profile_image_path(&self) -> Option<&str> {
        self.profile_image_path.as_deref()
    }

    /// Returns the account creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_is_lowercased() {
        let email = EmailAddress::new("  Emma@Web.DE ");
        assert_eq!(
            email.map(String::from).unwrap_or_default(),
            "emma@web.de".to_owned()
        );
    }

    #[test]
    fn email_with_two_at_signs_is_rejected() {
        assert!(EmailAddress::new("a@b@c.de").is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("user@nodot").is_err());
    }

    #[test]
    fn overlong_email_is_rejected() {
        let local = "a".repeat(40);
        assert!(EmailAddress::new(format!("{local}@web.de")).is_err());
    }

    #[test]
    fn blank_username_is_rejected() {
        assert!(Username::new("   ").is_err());
        assert!(Username::new("x".repeat(USER_TEXT_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn password_requires_all_character_classes() {
        assert!(validate_password("Miau.6").is_ok());
        assert!(validate_password("miau.6").is_err());
        assert!(validate_password("MIAU.6").is_err());
        assert!(validate_password("Miau.x").is_err());
        assert!(validate_password("Miau66").is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("M.6a").is_err());
    }

    #[test]
    fn very_long_password_is_rejected() {
        let long = format!("Aa1.{}", "b".repeat(PASSWORD_MAX_LENGTH));
        assert!(validate_password(&long).is_err());
    }

    #[test]
    fn role_round_trips_through_storage_string() {
        for role in [Role::User, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().ok(), Some(role));
        }
        assert!("owner".parse::<Role>().is_err());
    }
}
