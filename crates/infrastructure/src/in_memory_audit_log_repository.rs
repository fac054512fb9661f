use async_trait::async_trait;
use chrono::Utc;
use gatherly_application::{AuditLogRepository, AuditRecord};
use gatherly_core::AppResult;
use gatherly_domain::{AuditAction, AuditLogEntry, EventId, UserId};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory audit log repository implementation.
///
/// Entries are held in append order; reads walk the list backwards so
/// newest-first holds even when timestamps collide.
#[derive(Debug, Default)]
pub struct InMemoryAuditLogRepository {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditLogRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    async fn collect_newest_first<F>(&self, keep: F) -> Vec<AuditLogEntry>
    where
        F: Fn(&AuditLogEntry) -> bool,
    {
        self.entries
            .read()
            .await
            .iter()
            .rev()
            .filter(|entry| keep(entry))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn append(&self, record: AuditRecord) -> AppResult<AuditLogEntry> {
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            event_id: record.event_id,
            user_id: record.user_id,
            organizer_id: record.organizer_id,
            action: record.action,
            created_at: Utc::now(),
        };

        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn list_for_event(&self, event_id: EventId) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .collect_newest_first(|entry| entry.event_id == event_id)
            .await)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        action: AuditAction,
    ) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .collect_newest_first(|entry| entry.user_id == user_id && entry.action == action)
            .await)
    }

    async fn list_for_organizer(
        &self,
        organizer_id: UserId,
        action: AuditAction,
    ) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .collect_newest_first(|entry| {
                entry.organizer_id == organizer_id && entry.action == action
            })
            .await)
    }
}

#[cfg(test)]
mod tests {
    use gatherly_application::{AuditLogRepository, AuditRecord};
    use gatherly_core::AppResult;
    use gatherly_domain::{AuditAction, EventId, UserId};

    use super::InMemoryAuditLogRepository;

    #[tokio::test]
    async fn event_entries_come_back_newest_first() -> AppResult<()> {
        let repository = InMemoryAuditLogRepository::new();
        let event_id = EventId::new();
        let organizer = UserId::new();
        let attendee = UserId::new();

        repository
            .append(AuditRecord {
                event_id,
                user_id: organizer,
                organizer_id: organizer,
                action: AuditAction::EventCreated,
            })
            .await?;
        repository
            .append(AuditRecord {
                event_id,
                user_id: attendee,
                organizer_id: organizer,
                action: AuditAction::UserRegistered,
            })
            .await?;

        let entries = repository.list_for_event(event_id).await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, AuditAction::UserRegistered);
        assert_eq!(entries[1].action, AuditAction::EventCreated);

        let by_actor = repository
            .list_for_user(attendee, AuditAction::UserRegistered)
            .await?;
        assert_eq!(by_actor.len(), 1);

        let by_owner = repository
            .list_for_organizer(organizer, AuditAction::EventCreated)
            .await?;
        assert_eq!(by_owner.len(), 1);

        Ok(())
    }
}
