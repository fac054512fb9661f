//! Bearer-credential extraction for protected routes.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use gatherly_core::{AppError, UserIdentity};

use crate::error::ApiError;
use crate::state::AppState;

/// The verified identity behind the request's bearer token.
///
/// Extraction runs the full authorization gate: signature and expiry checks
/// on the token, then a re-fetch of the user record, so handlers that take
/// this extractor never see a deleted account or a forged role. Any failure
/// rejects the request with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError(AppError::Unauthorized("authentication required".to_owned()))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(AppError::Unauthorized(
                "authorization header must use the Bearer scheme".to_owned(),
            ))
        })?;

        let identity = state.authorization_service.authenticate(token).await?;

        Ok(Self(identity))
    }
}
