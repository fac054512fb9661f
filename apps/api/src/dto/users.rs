use serde::{Deserialize, Serialize};
use ts_rs::TS;

use gatherly_application::AuthSession;

use super::common::UserSummaryResponse;
use super::events::EventResponse;

/// Incoming payload for account registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-user-request.ts"
)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Requested role; defaults to `user` when absent.
    pub role: Option<String>,
}

/// Incoming payload for login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Incoming payload for profile edits. Role is not editable.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-profile-request.ts"
)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Account summary plus a fresh bearer token.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/session-response.ts"
)]
pub struct SessionResponse {
    pub user: UserSummaryResponse,
    pub token: String,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserSummaryResponse::from(session.user),
            token: session.token,
        }
    }
}

/// Profile view: the account plus the events it organizes and attends.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/profile-response.ts"
)]
pub struct ProfileResponse {
    pub user: UserSummaryResponse,
    pub organized_events: Vec<EventResponse>,
    pub registered_events: Vec<EventResponse>,
}
