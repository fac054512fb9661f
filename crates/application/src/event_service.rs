//! Event ports and application service.
//!
//! Hosts the capacity guard: the one mutating path with a real invariant.
//! Everything funnels through [`EventRepository::append_attendee`], which
//! implementations must execute as a single atomic conditional update.

use std::sync::Arc;

use async_trait::async_trait;

use gatherly_core::AppResult;
use gatherly_domain::{Event, EventDraft, EventId, EventPatch, EventQuery, UserId};

use crate::audit_log_service::AuditLogService;
use crate::user_service::{UserRepository, UserSummary};

mod management;
mod queries;
mod registration;

#[cfg(test)]
mod tests;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Outcome of a conditional attendee append.
///
/// The repository reports which guard refused the append; user-facing
/// messages stay in the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendeeAppend {
    /// The attendee holds a seat; the updated event is returned.
    Appended(Event),
    /// The attendee already held a seat; nothing changed.
    AlreadyRegistered,
    /// Every seat was taken; nothing changed.
    HouseFull,
}

/// Repository port for event persistence.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Creates an event with a server-assigned id and timestamp.
    async fn create(&self, draft: EventDraft, organizer: UserId) -> AppResult<Event>;

    /// Finds an event by its unique identifier.
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;

    /// Lists events matching the browse filters.
    async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>>;

    /// Lists events owned by the organizer.
    async fn list_by_organizer(&self, organizer: UserId) -> AppResult<Vec<Event>>;

    /// Lists events where the user holds a seat.
    async fn list_by_attendee(&self, attendee: UserId) -> AppResult<Vec<Event>>;

    /// Persists the editable fields of an already-loaded event.
    ///
    /// Only title, description, date, location, and category are written;
    /// capacity, organizer, and the attendee list are never touched, so a
    /// stale in-memory copy cannot clobber a concurrent registration.
    async fn update_details(&self, event: &Event) -> AppResult<Event>;

    /// Deletes an event. Missing ids yield `AppError::NotFound`.
    async fn delete(&self, event_id: EventId) -> AppResult<()>;

    /// Appends an attendee iff they are absent and a seat remains.
    ///
    /// The duplicate check, the capacity check, and the append MUST execute
    /// as one atomic unit against concurrent calls for the same event: a
    /// single conditional statement, or one write-lock scope. Two calls
    /// racing for the last seat must never both observe `Appended`.
    async fn append_attendee(
        &self,
        event_id: EventId,
        attendee: UserId,
    ) -> AppResult<AttendeeAppend>;
}

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

/// One row of the public browse listing.
#[derive(Debug, Clone)]
pub struct EventListing {
    /// The event itself.
    pub event: Event,
    /// Summary of the owning organizer, when the account still exists.
    pub organizer: Option<UserSummary>,
}

/// Full event detail with resolved participant summaries.
#[derive(Debug, Clone)]
pub struct EventDetails {
    /// The event itself.
    pub event: Event,
    /// Summary of the owning organizer, when the account still exists.
    pub organizer: Option<UserSummary>,
    /// Summaries for every attendee account that still exists.
    pub attendees: Vec<UserSummary>,
}

/// Snapshot of an event's seat accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityStatus {
    /// Maximum attendee count.
    pub capacity: u32,
    /// Seats currently taken.
    pub attendees_count: u32,
    /// Seats still open.
    pub available_seats: u32,
    /// Whether every seat is taken.
    pub is_house_full: bool,
}

impl CapacityStatus {
    /// Computes the snapshot for an event.
    #[must_use]
    pub fn of(event: &Event) -> Self {
        Self {
            capacity: event.capacity(),
            attendees_count: event.attendee_count(),
            available_seats: event.available_seats(),
            is_house_full: event.is_house_full(),
        }
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    /// The event as stored after the append.
    pub event: Event,
    /// Seat accounting recomputed post-mutation.
    pub capacity: CapacityStatus,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for event lifecycle and registration.
#[derive(Clone)]
pub struct EventService {
    event_repository: Arc<dyn EventRepository>,
    user_repository: Arc<dyn UserRepository>,
    audit_log: AuditLogService,
}

impl EventService {
    /// Creates a new event service.
    #[must_use]
    pub fn new(
        event_repository: Arc<dyn EventRepository>,
        user_repository: Arc<dyn UserRepository>,
        audit_log: AuditLogService,
    ) -> Self {
        Self {
            event_repository,
            user_repository,
            audit_log,
        }
    }

    async fn user_summary(&self, user_id: UserId) -> AppResult<Option<UserSummary>> {
        Ok(self
            .user_repository
            .find_by_id(user_id)
            .await?
            .map(UserSummary::from))
    }
}
