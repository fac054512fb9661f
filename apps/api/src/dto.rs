mod common;
mod events;
mod users;

pub use common::{ApiEnvelope, HealthResponse, UserSummaryResponse};
pub use events::{
    AuditLogEntryResponse, CapacityResponse, CreateEventRequest, EventDetailsResponse,
    EventListingResponse, EventQueryParams, EventResponse, UpdateEventRequest,
};
pub use users::{
    LoginRequest, ProfileResponse, RegisterUserRequest, SessionResponse, UpdateProfileRequest,
};
