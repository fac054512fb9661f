//! Event aggregate and its capacity invariants.

use chrono::{DateTime, Utc};
use gatherly_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::UserId;

/// Unique identifier for an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated input for event creation.
///
/// Capacity is fixed here and never changes afterwards; [`EventPatch`]
/// deliberately has no capacity field.
#[derive(Debug, Clone)]
pub struct EventDraft {
    title: NonEmptyString,
    description: NonEmptyString,
    date: DateTime<Utc>,
    location: NonEmptyString,
    category: NonEmptyString,
    capacity: u32,
}

impl EventDraft {
    /// Creates a validated event draft.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: DateTime<Utc>,
        location: impl Into<String>,
        category: impl Into<String>,
        capacity: u32,
    ) -> AppResult<Self> {
        if capacity == 0 {
            return Err(AppError::Validation(
                "event capacity must be a positive integer".to_owned(),
            ));
        }

        Ok(Self {
            title: NonEmptyString::new(title)?,
            description: NonEmptyString::new(description)?,
            date,
            location: NonEmptyString::new(location)?,
            category: NonEmptyString::new(category)?,
            capacity,
        })
    }
}

/// Result of asking an event to admit one more attendee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The attendee was appended and holds a seat.
    Admitted,
    /// The attendee already holds a seat; nothing changed.
    AlreadyRegistered,
    /// Every seat is taken; nothing changed.
    HouseFull,
}

/// An event with a bounded attendee list.
///
/// Holds the one hard invariant of the system: the attendee list never
/// exceeds `capacity` and never contains the same user twice. All attendee
/// mutation funnels through [`Event::admit`], which callers must run inside
/// their store's atomic update (a single conditional statement or one write
/// guard), never as separate check and write calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    title: NonEmptyString,
    description: NonEmptyString,
    date: DateTime<Utc>,
    location: NonEmptyString,
    category: NonEmptyString,
    capacity: u32,
    organizer: UserId,
    attendees: Vec<UserId>,
    created_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event from a validated draft with no attendees.
    #[must_use]
    pub fn new(id: EventId, draft: EventDraft, organizer: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            location: draft.location,
            category: draft.category,
            capacity: draft.capacity,
            organizer,
            attendees: Vec::new(),
            created_at,
        }
    }

    /// Restores an event from persisted state.
    ///
    /// Duplicate attendees are dropped so a corrupted row cannot smuggle an
    /// invariant violation back into the domain. Field validation happens in
    /// the [`EventDraft`] the caller rebuilds from the stored row.
    #[must_use]
    pub fn restore(
        id: EventId,
        draft: EventDraft,
        organizer: UserId,
        attendees: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut deduped: Vec<UserId> = Vec::with_capacity(attendees.len());
        for attendee in attendees {
            if !deduped.contains(&attendee) {
                deduped.push(attendee);
            }
        }

        Self {
            id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            location: draft.location,
            category: draft.category,
            capacity: draft.capacity,
            organizer,
            attendees: deduped,
            created_at,
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Returns the event title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the event description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the scheduled date.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the event location.
    #[must_use]
    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Returns the event category.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Returns the maximum attendee count.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the organizer who owns this event.
    #[must_use]
    pub fn organizer(&self) -> UserId {
        self.organizer
    }

    /// Returns attendees in registration order.
    #[must_use]
    pub fn attendees(&self) -> &[UserId] {
        self.attendees.as_slice()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the user already holds a seat.
    #[must_use]
    pub fn has_attendee(&self, user_id: UserId) -> bool {
        self.attendees.contains(&user_id)
    }

    /// Returns the current attendee count.
    #[must_use]
    pub fn attendee_count(&self) -> u32 {
        u32::try_from(self.attendees.len()).unwrap_or(u32::MAX)
    }

    /// Returns the number of seats still open.
    #[must_use]
    pub fn available_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.attendee_count())
    }

    /// Returns whether every seat is taken.
    #[must_use]
    pub fn is_house_full(&self) -> bool {
        self.available_seats() == 0
    }

    /// Appends an attendee if they are absent and a seat remains.
    ///
    /// The duplicate check runs before the capacity check so a registered
    /// user on a full event hears "already registered", not "house full".
    pub fn admit(&mut self, user_id: UserId) -> Admission {
        if self.has_attendee(user_id) {
            return Admission::AlreadyRegistered;
        }

        if self.is_house_full() {
            return Admission::HouseFull;
        }

        self.attendees.push(user_id);
        Admission::Admitted
    }

    /// Applies a field edit, re-validating each changed value.
    pub fn apply(&mut self, patch: EventPatch) -> AppResult<()> {
        if let Some(title) = patch.title {
            self.title = NonEmptyString::new(title)?;
        }
        if let Some(description) = patch.description {
            self.description = NonEmptyString::new(description)?;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(location) = patch.location {
            self.location = NonEmptyString::new(location)?;
        }
        if let Some(category) = patch.category {
            self.category = NonEmptyString::new(category)?;
        }

        Ok(())
    }
}

/// Field edits an organizer may apply to an owned event.
///
/// Capacity, organizer, and the attendee list are not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement date.
    pub date: Option<DateTime<Utc>>,
    /// Replacement location.
    pub location: Option<String>,
    /// Replacement category.
    pub category: Option<String>,
}

impl EventPatch {
    /// Returns whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.category.is_none()
    }
}

/// Browse filters for the public event list.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive location substring.
    pub location: Option<String>,
    /// Lower bound on the event date.
    pub date_from: Option<DateTime<Utc>>,
}

impl EventQuery {
    /// Returns whether the event satisfies every present filter.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(category) = &self.category
            && event.category() != category
        {
            return false;
        }

        if let Some(location) = &self.location
            && !event
                .location()
                .to_lowercase()
                .contains(&location.to_lowercase())
        {
            return false;
        }

        if let Some(date_from) = self.date_from
            && event.date() < date_from
        {
            return false;
        }

        true
    }
}
