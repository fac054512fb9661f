use gatherly_application::UserSummary;
use serde::Serialize;
use ts_rs::TS;

/// Success envelope wrapping every JSON payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/api-envelope.ts"
)]
pub struct ApiEnvelope<T: TS> {
    pub status: &'static str,
    pub data: T,
}

impl<T: TS> ApiEnvelope<T> {
    /// Wraps a payload in the success envelope.
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// User fields safe to return in responses. The password hash never
/// reaches this type.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-summary-response.ts"
)]
pub struct UserSummaryResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name,
            email: summary.email,
            role: summary.role.as_str().to_owned(),
        }
    }
}
