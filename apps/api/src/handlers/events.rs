use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use gatherly_core::AppError;
use gatherly_domain::{EventDraft, EventId, EventPatch, EventQuery};

use crate::auth::CurrentUser;
use crate::dto::{
    ApiEnvelope, AuditLogEntryResponse, CapacityResponse, CreateEventRequest,
    EventDetailsResponse, EventListingResponse, EventQueryParams, EventResponse,
    UpdateEventRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;


pub async fn list_events_handler(
    State(state): State<AppState>,
    Query(params): Query<EventQueryParams>,
) -> ApiResult<Json<ApiEnvelope<Vec<EventListingResponse>>>> {
    let query = EventQuery::try_from(params)?;
    let listings = state.event_service.browse(&query).await?;

    Ok(Json(ApiEnvelope::success(
        listings
            .into_iter()
            .map(EventListingResponse::from)
            .collect(),
    )))
}

pub async fn event_details_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<EventDetailsResponse>>> {
    let event_id = parse_event_id(&event_id)?;
    let details = state.event_service.event_details(event_id).await?;

    Ok(Json(ApiEnvelope::success(EventDetailsResponse::from(
        details,
    ))))
}

pub async fn create_event_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<EventResponse>>)> {
    let draft = EventDraft::try_from(payload)?;
    let event = state.event_service.create_event(&user, draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::success(EventResponse::from(&event))),
    ))
}

pub async fn update_event_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> ApiResult<Json<ApiEnvelope<EventResponse>>> {
    let event_id = parse_event_id(&event_id)?;
    let patch = EventPatch::try_from(payload)?;
    let event = state
        .event_service
        .update_event(&user, event_id, patch)
        .await?;

    Ok(Json(ApiEnvelope::success(EventResponse::from(&event))))
}

pub async fn delete_event_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<String>,
) -> ApiResult<StatusCode> {
    let event_id = parse_event_id(&event_id)?;
    state.event_service.delete_event(&user, event_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn register_event_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<EventResponse>>> {
    let event_id = parse_event_id(&event_id)?;
    let receipt = state
        .event_service
        .register_attendee(&user, event_id)
        .await?;

    Ok(Json(ApiEnvelope::success(EventResponse::from(
        &receipt.event,
    ))))
}

pub async fn event_capacity_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<CapacityResponse>>> {
    let event_id = parse_event_id(&event_id)?;
    let status = state.event_service.capacity_status(event_id).await?;

    Ok(Json(ApiEnvelope::success(CapacityResponse::from(status))))
}

pub async fn event_logs_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<Vec<AuditLogEntryResponse>>>> {
    let event_id = parse_event_id(&event_id)?;
    let entries = state
        .event_service
        .view_event_logs(&user, event_id)
        .await?;

    Ok(Json(ApiEnvelope::success(
        entries
            .into_iter()
            .map(AuditLogEntryResponse::from)
            .collect(),
    )))
}

fn parse_event_id(raw: &str) -> Result<EventId, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map(EventId::from_uuid)
        .map_err(|_| ApiError(AppError::Validation(format!("invalid event id '{raw}'"))))
}
