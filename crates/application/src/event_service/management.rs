use gatherly_core::{Role, UserIdentity};

use crate::authorization_service::AuthorizationService;

use super::registration::event_not_found;
use super::*;

impl EventService {
    /// Creates an event owned by the caller.
    pub async fn create_event(
        &self,
        identity: &UserIdentity,
        draft: EventDraft,
    ) -> AppResult<Event> {
        AuthorizationService::require_role(identity, &[Role::Organizer, Role::Admin])?;

        let organizer = UserId::from_uuid(identity.user_id());
        let event = self.event_repository.create(draft, organizer).await?;

        self.audit_log.record_event_created(&event).await;

        Ok(event)
    }

    /// Applies field edits to an owned event.
    pub async fn update_event(
        &self,
        identity: &UserIdentity,
        event_id: EventId,
        patch: EventPatch,
    ) -> AppResult<Event> {
        AuthorizationService::require_role(identity, &[Role::Organizer, Role::Admin])?;

        let mut event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(event_not_found)?;

        AuthorizationService::require_owner_or_admin(identity, &event, "update")?;

        if patch.is_empty() {
            return Ok(event);
        }

        event.apply(patch)?;
        self.event_repository.update_details(&event).await
    }

    /// Deletes an owned event.
    pub async fn delete_event(
        &self,
        identity: &UserIdentity,
        event_id: EventId,
    ) -> AppResult<()> {
        AuthorizationService::require_role(identity, &[Role::Organizer, Role::Admin])?;

        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(event_not_found)?;

        AuthorizationService::require_owner_or_admin(identity, &event, "delete")?;

        self.event_repository.delete(event_id).await
    }
}
