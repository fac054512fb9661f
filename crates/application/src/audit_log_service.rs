//! Append-only audit log port and best-effort writer.

use std::sync::Arc;

use async_trait::async_trait;
use gatherly_core::{AppResult, Role, UserIdentity};
use gatherly_domain::{AuditAction, AuditLogEntry, Event, EventId, UserId};

#[cfg(test)]
mod tests;

/// Payload for one audit append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// Event the action touched.
    pub event_id: EventId,
    /// User who performed the action.
    pub user_id: UserId,
    /// Owner of the touched event.
    pub organizer_id: UserId,
    /// What happened.
    pub action: AuditAction,
}

/// Repository port for persisting and reading audit entries.
///
/// Entries are immutable; there are no update or delete operations. Every
/// read returns newest-first.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Persists one entry with a server-assigned id and timestamp.
    async fn append(&self, record: AuditRecord) -> AppResult<AuditLogEntry>;

    /// Lists entries for one event, newest-first.
    async fn list_for_event(&self, event_id: EventId) -> AppResult<Vec<AuditLogEntry>>;

    /// Lists entries where the user is the acting subject, newest-first.
    async fn list_for_user(
        &self,
        user_id: UserId,
        action: AuditAction,
    ) -> AppResult<Vec<AuditLogEntry>>;

    /// Lists entries where the user owns the touched event, newest-first.
    async fn list_for_organizer(
        &self,
        organizer_id: UserId,
        action: AuditAction,
    ) -> AppResult<Vec<AuditLogEntry>>;
}

/// Application service wrapping the audit repository.
///
/// Writes run after the primary state change has committed, and a failed
/// append never rolls it back: the error is logged and swallowed. The log
/// is a secondary record, the event row is the system of record.
#[derive(Clone)]
pub struct AuditLogService {
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    /// Creates a new audit log service.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    /// Records that the event was created. Best-effort.
    pub async fn record_event_created(&self, event: &Event) {
        self.record(AuditRecord {
            event_id: event.id(),
            user_id: event.organizer(),
            organizer_id: event.organizer(),
            action: AuditAction::EventCreated,
        })
        .await;
    }

    /// Records that `attendee` took a seat on the event. Best-effort.
    pub async fn record_user_registered(&self, event: &Event, attendee: UserId) {
        self.record(AuditRecord {
            event_id: event.id(),
            user_id: attendee,
            organizer_id: event.organizer(),
            action: AuditAction::UserRegistered,
        })
        .await;
    }

    /// Lists one event's entries, newest-first.
    pub async fn event_logs(&self, event_id: EventId) -> AppResult<Vec<AuditLogEntry>> {
        self.repository.list_for_event(event_id).await
    }

    /// Lists the dashboard entries for an authenticated user.
    ///
    /// Organizers and admins see creation entries for events they own;
    /// everyone sees their own registration entries. Merged newest-first.
    pub async fn user_logs(&self, identity: &UserIdentity) -> AppResult<Vec<AuditLogEntry>> {
        let user_id = UserId::from_uuid(identity.user_id());

        let mut entries = self
            .repository
            .list_for_user(user_id, AuditAction::UserRegistered)
            .await?;

        if matches!(identity.role(), Role::Organizer | Role::Admin) {
            entries.extend(
                self.repository
                    .list_for_organizer(user_id, AuditAction::EventCreated)
                    .await?,
            );
        }

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn record(&self, record: AuditRecord) {
        let action = record.action;
        let event_id = record.event_id;

        if let Err(error) = self.repository.append(record).await {
            tracing::warn!(
                action = action.as_str(),
                event_id = %event_id,
                %error,
                "audit log append failed; primary operation unaffected"
            );
        }
    }
}
