use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use gatherly_application::{CapacityStatus, EventDetails, EventListing};
use gatherly_core::{AppError, AppResult};
use gatherly_domain::{AuditLogEntry, Event, EventDraft, EventPatch, EventQuery};

use super::common::UserSummaryResponse;

/// API representation of an event, including the derived seat accounting.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/event-response.ts"
)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub category: String,
    pub capacity: u32,
    pub organizer_id: String,
    pub attendees_count: u32,
    pub available_seats: u32,
    pub is_house_full: bool,
    pub created_at: String,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            title: event.title().to_owned(),
            description: event.description().to_owned(),
            date: event.date().to_rfc3339(),
            location: event.location().to_owned(),
            category: event.category().to_owned(),
            capacity: event.capacity(),
            organizer_id: event.organizer().to_string(),
            attendees_count: event.attendee_count(),
            available_seats: event.available_seats(),
            is_house_full: event.is_house_full(),
            created_at: event.created_at().to_rfc3339(),
        }
    }
}

/// One row of the public browse listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/event-listing-response.ts"
)]
pub struct EventListingResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub organizer: Option<UserSummaryResponse>,
}

impl From<EventListing> for EventListingResponse {
    fn from(listing: EventListing) -> Self {
        Self {
            event: EventResponse::from(&listing.event),
            organizer: listing.organizer.map(UserSummaryResponse::from),
        }
    }
}

/// Full event detail with resolved participant summaries.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/event-details-response.ts"
)]
pub struct EventDetailsResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub organizer: Option<UserSummaryResponse>,
    pub attendees: Vec<UserSummaryResponse>,
}

impl From<EventDetails> for EventDetailsResponse {
    fn from(details: EventDetails) -> Self {
        Self {
            event: EventResponse::from(&details.event),
            organizer: details.organizer.map(UserSummaryResponse::from),
            attendees: details
                .attendees
                .into_iter()
                .map(UserSummaryResponse::from)
                .collect(),
        }
    }
}

/// Seat accounting snapshot for one event.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/capacity-response.ts"
)]
pub struct CapacityResponse {
    pub capacity: u32,
    pub attendees_count: u32,
    pub available_seats: u32,
    pub is_house_full: bool,
}

impl From<CapacityStatus> for CapacityResponse {
    fn from(status: CapacityStatus) -> Self {
        Self {
            capacity: status.capacity,
            attendees_count: status.attendees_count,
            available_seats: status.available_seats,
            is_house_full: status.is_house_full,
        }
    }
}

/// API representation of one audit trail entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub organizer_id: String,
    pub action: String,
    pub created_at: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            event_id: entry.event_id.to_string(),
            user_id: entry.user_id.to_string(),
            organizer_id: entry.organizer_id.to_string(),
            action: entry.action.as_str().to_owned(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for event creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-event-request.ts"
)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub category: String,
    pub capacity: u32,
}

impl TryFrom<CreateEventRequest> for EventDraft {
    type Error = AppError;

    fn try_from(request: CreateEventRequest) -> Result<Self, Self::Error> {
        let date = parse_date(&request.date)?;

        EventDraft::new(
            request.title,
            request.description,
            date,
            request.location,
            request.category,
            request.capacity,
        )
    }
}

/// Incoming payload for event field edits. Capacity is not editable.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-event-request.ts"
)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
}

impl TryFrom<UpdateEventRequest> for EventPatch {
    type Error = AppError;

    fn try_from(request: UpdateEventRequest) -> Result<Self, Self::Error> {
        let date = request.date.as_deref().map(parse_date).transpose()?;

        Ok(Self {
            title: request.title,
            description: request.description,
            date,
            location: request.location,
            category: request.category,
        })
    }
}

/// Browse filters accepted on the event list endpoint.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/event-query-params.ts"
)]
pub struct EventQueryParams {
    pub category: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
}

impl TryFrom<EventQueryParams> for EventQuery {
    type Error = AppError;

    fn try_from(params: EventQueryParams) -> Result<Self, Self::Error> {
        let date_from = params.date.as_deref().map(parse_date).transpose()?;

        Ok(Self {
            category: params.category,
            location: params.location,
            date_from,
        })
    }
}

/// Parses a wire date: RFC 3339, or a plain `YYYY-MM-DD` taken as UTC
/// midnight.
pub(crate) fn parse_date(value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(parsed.and_time(NaiveTime::MIN).and_utc());
    }

    Err(AppError::Validation(format!(
        "invalid date value '{value}', expected RFC 3339 or YYYY-MM-DD"
    )))
}

#[cfg(test)]
mod tests {
    use super::parse_date;

    #[test]
    fn parse_date_accepts_rfc3339_and_plain_dates() {
        assert!(parse_date("2026-09-12T18:00:00Z").is_ok());
        assert!(parse_date("2026-09-12T18:00:00+02:00").is_ok());
        assert!(parse_date("2026-09-12").is_ok());
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("next tuesday").is_err());
        assert!(parse_date("12.09.2026").is_err());
    }
}
