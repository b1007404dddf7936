//! Session-based authentication handlers.

mod password;
mod session;

pub use password::{login_handler, register_handler};
pub use session::{logout_handler, me_handler, read_session_identity};

pub const SESSION_USER_KEY: &str = "user_identity";
/// Unix timestamp of the login that created the session.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
