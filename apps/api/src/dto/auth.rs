use serde::Deserialize;
use ts_rs::TS;

/// Incoming payload for account registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/register-request.ts"
)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
