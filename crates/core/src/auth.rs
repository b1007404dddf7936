use serde::{Deserialize, Serialize};

/// User information persisted in the authenticated session.
///
/// Only the stable user id is trusted on later requests; the role is
/// reloaded from storage so that role changes take effect immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: i64,
    username: String,
    email: String,
}

impl UserIdentity {
    /// Creates a user identity from a freshly authenticated account.
    #[must_use]
    pub fn new(user_id: i64, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Returns the numeric id of the authenticated account.
    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Returns the username captured at login.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the email captured at login.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}
