use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gatherly_core::AppError;
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
///
/// Every failure uses the same envelope: `status` is `"fail"` for client
/// errors and `"error"` for server errors, so the frontend branches on one
/// field. Capacity refusals additionally carry `isHouseFull` so the UI can
/// render a sold-out state instead of a generic error.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_house_full: Option<bool>,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) | AppError::BusinessRule(_) | AppError::CapacityExceeded(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorResponse {
            status: if status.is_server_error() {
                "error"
            } else {
                "fail"
            },
            is_house_full: match self.0 {
                AppError::CapacityExceeded(_) => Some(true),
                _ => None,
            },
            message: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
