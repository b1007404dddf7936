use dishpicker_application::UpdateUserParams;
use dishpicker_domain::User;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of an account. Credentials are never serialized.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[ts(type = "\"user\" | \"admin\"")]
    pub role: String,
    pub profile_image_path: Option<String>,
    pub created_at: String,
}

/// Incoming payload for a partial account update.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-user-request.ts"
)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Incoming payload pointing an account at an already stored image.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/set-user-image-request.ts"
)]
pub struct SetUserImageRequest {
    pub path: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().as_i64(),
            username: user.username().as_str().to_owned(),
            email: user.email().as_str().to_owned(),
            role: user.role().as_str().to_owned(),
            profile_image_path: user.profile_image_path().map(ToOwned::to_owned),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

impl From<UpdateUserRequest> for UpdateUserParams {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            password: value.password,
        }
    }
}
