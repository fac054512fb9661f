use gatherly_core::{AppError, Role, UserIdentity};
use gatherly_domain::UserId;

use super::*;

impl EventService {
    /// Registers the caller for an event — the capacity guard.
    ///
    /// Precondition order is part of the contract: a missing event answers
    /// before the role rule, the role rule before the duplicate check, the
    /// duplicate check before capacity. The duplicate and capacity checks
    /// ride inside the repository's atomic append, so two requests racing
    /// for the last seat cannot both win.
    pub async fn register_attendee(
        &self,
        identity: &UserIdentity,
        event_id: EventId,
    ) -> AppResult<RegistrationReceipt> {
        self.event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(event_not_found)?;

        if identity.role() == Role::Organizer {
            return Err(AppError::Forbidden(
                "organizers cannot register for events".to_owned(),
            ));
        }

        let attendee = UserId::from_uuid(identity.user_id());

        match self
            .event_repository
            .append_attendee(event_id, attendee)
            .await?
        {
            AttendeeAppend::Appended(event) => {
                self.audit_log.record_user_registered(&event, attendee).await;

                Ok(RegistrationReceipt {
                    capacity: CapacityStatus::of(&event),
                    event,
                })
            }
            AttendeeAppend::AlreadyRegistered => Err(AppError::BusinessRule(
                "you are already registered for this event".to_owned(),
            )),
            AttendeeAppend::HouseFull => Err(AppError::CapacityExceeded(
                "this event is now full and not accepting new registrations".to_owned(),
            )),
        }
    }
}

pub(super) fn event_not_found() -> AppError {
    AppError::NotFound("event not found".to_owned())
}
