use std::str::FromStr;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use gatherly_application::{ProfileUpdateParams, RegisterParams};
use gatherly_core::Role;
use gatherly_domain::UserId;

use crate::auth::CurrentUser;
use crate::dto::{
    ApiEnvelope, AuditLogEntryResponse, EventResponse, LoginRequest, ProfileResponse,
    RegisterUserRequest, SessionResponse, UpdateProfileRequest, UserSummaryResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<SessionResponse>>)> {
    let role = payload.role.as_deref().map(Role::from_str).transpose()?;

    let session = state
        .user_service
        .register(RegisterParams {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::success(SessionResponse::from(session))),
    ))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<ApiEnvelope<SessionResponse>>> {
    let session = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiEnvelope::success(SessionResponse::from(session))))
}

pub async fn profile_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<ApiEnvelope<ProfileResponse>>> {
    let user_id = UserId::from_uuid(user.user_id());

    let summary = state.user_service.profile(user_id).await?;
    let organized = state.event_service.events_by_organizer(user_id).await?;
    let registered = state.event_service.events_attended_by(user_id).await?;

    Ok(Json(ApiEnvelope::success(ProfileResponse {
        user: UserSummaryResponse::from(summary),
        organized_events: organized.iter().map(EventResponse::from).collect(),
        registered_events: registered.iter().map(EventResponse::from).collect(),
    })))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ApiEnvelope<SessionResponse>>> {
    let user_id = UserId::from_uuid(user.user_id());

    let session = state
        .user_service
        .update_profile(
            user_id,
            ProfileUpdateParams {
                name: payload.name,
                email: payload.email,
                password: payload.password,
            },
        )
        .await?;

    Ok(Json(ApiEnvelope::success(SessionResponse::from(session))))
}

pub async fn user_logs_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<ApiEnvelope<Vec<AuditLogEntryResponse>>>> {
    let entries = state.audit_log_service.user_logs(&user).await?;

    Ok(Json(ApiEnvelope::success(
        entries
            .into_iter()
            .map(AuditLogEntryResponse::from)
            .collect(),
    )))
}
