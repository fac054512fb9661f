use gatherly_core::UserIdentity;
use gatherly_domain::AuditLogEntry;

use crate::authorization_service::AuthorizationService;

use super::registration::event_not_found;
use super::*;

impl EventService {
    /// Lists events matching the public browse filters.
    pub async fn browse(&self, query: &EventQuery) -> AppResult<Vec<EventListing>> {
        let events = self.event_repository.list(query).await?;

        let mut listings = Vec::with_capacity(events.len());
        for event in events {
            let organizer = self.user_summary(event.organizer()).await?;
            listings.push(EventListing { event, organizer });
        }

        Ok(listings)
    }

    /// Loads one event with resolved organizer and attendee summaries.
    pub async fn event_details(&self, event_id: EventId) -> AppResult<EventDetails> {
        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(event_not_found)?;

        let organizer = self.user_summary(event.organizer()).await?;

        let mut attendees = Vec::with_capacity(event.attendees().len());
        for attendee in event.attendees() {
            if let Some(summary) = self.user_summary(*attendee).await? {
                attendees.push(summary);
            }
        }

        Ok(EventDetails {
            event,
            organizer,
            attendees,
        })
    }

    /// Returns the seat accounting for one event.
    pub async fn capacity_status(&self, event_id: EventId) -> AppResult<CapacityStatus> {
        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(event_not_found)?;

        Ok(CapacityStatus::of(&event))
    }

    /// Lists an event's audit entries for its owner or an admin.
    pub async fn view_event_logs(
        &self,
        identity: &UserIdentity,
        event_id: EventId,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(event_not_found)?;

        AuthorizationService::require_owner_or_admin(identity, &event, "view logs for")?;

        self.audit_log.event_logs(event_id).await
    }

    /// Lists events owned by the user, for the profile view.
    pub async fn events_by_organizer(&self, organizer: UserId) -> AppResult<Vec<Event>> {
        self.event_repository.list_by_organizer(organizer).await
    }

    /// Lists events the user is registered for, for the profile view.
    pub async fn events_attended_by(&self, attendee: UserId) -> AppResult<Vec<Event>> {
        self.event_repository.list_by_attendee(attendee).await
    }
}
