use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use gatherly_application::{AttendeeAppend, EventRepository};
use gatherly_core::{AppError, AppResult};
use gatherly_domain::{Admission, Event, EventDraft, EventId, EventPatch, EventQuery, UserId};
use tokio::sync::RwLock;


/// In-memory event repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }
}

fn sorted_by_date(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by_key(Event::date);
    events
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, draft: EventDraft, organizer: UserId) -> AppResult<Event> {
        let event = Event::new(EventId::new(), draft, organizer, Utc::now());
        self.events.write().await.insert(event.id(), event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        Ok(self.events.read().await.get(&event_id).cloned())
    }

    async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        let events = self
            .events
            .read()
            .await
            .values()
            .filter(|event| query.matches(event))
            .cloned()
            .collect();

        Ok(sorted_by_date(events))
    }

    async fn list_by_organizer(&self, organizer: UserId) -> AppResult<Vec<Event>> {
        let events = self
            .events
            .read()
            .await
            .values()
            .filter(|event| event.organizer() == organizer)
            .cloned()
            .collect();

        Ok(sorted_by_date(events))
    }

    async fn list_by_attendee(&self, attendee: UserId) -> AppResult<Vec<Event>> {
        let events = self
            .events
            .read()
            .await
            .values()
            .filter(|event| event.has_attendee(attendee))
            .cloned()
            .collect();

        Ok(sorted_by_date(events))
    }

    async fn update_details(&self, updated: &Event) -> AppResult<Event> {
        let mut events = self.events.write().await;
        let stored = events
            .get_mut(&updated.id())
            .ok_or_else(|| AppError::NotFound("event not found".to_owned()))?;

        // Only editable fields cross over; the stored attendee list wins.
        stored.apply(EventPatch {
            title: Some(updated.title().to_owned()),
            description: Some(updated.description().to_owned()),
            date: Some(updated.date()),
            location: Some(updated.location().to_owned()),
            category: Some(updated.category().to_owned()),
        })?;

        Ok(stored.clone())
    }

    async fn delete(&self, event_id: EventId) -> AppResult<()> {
        self.events
            .write()
            .await
            .remove(&event_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("event not found".to_owned()))
    }

    async fn append_attendee(
        &self,
        event_id: EventId,
        attendee: UserId,
    ) -> AppResult<AttendeeAppend> {
        // One write guard spans the duplicate check, the capacity check,
        // and the append, so concurrent calls serialize here.
        let mut events = self.events.write().await;
        let stored = events
            .get_mut(&event_id)
            .ok_or_else(|| AppError::NotFound("event not found".to_owned()))?;

        Ok(match stored.admit(attendee) {
            Admission::Admitted => AttendeeAppend::Appended(stored.clone()),
            Admission::AlreadyRegistered => AttendeeAppend::AlreadyRegistered,
            Admission::HouseFull => AttendeeAppend::HouseFull,
        })
    }
}
