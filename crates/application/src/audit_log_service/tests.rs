use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use gatherly_core::{AppError, AppResult, Role, UserIdentity};
use gatherly_domain::{AuditAction, AuditLogEntry, Event, EventDraft, EventId, UserId};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AuditLogRepository, AuditLogService, AuditRecord};

#[derive(Default)]
struct FakeAuditLogRepository {
    entries: Mutex<Vec<AuditLogEntry>>,
    fail_appends: bool,
}

#[async_trait]
impl AuditLogRepository for FakeAuditLogRepository {
    async fn append(&self, record: AuditRecord) -> AppResult<AuditLogEntry> {
        if self.fail_appends {
            return Err(AppError::Internal("audit store down".to_owned()));
        }

        let mut entries = self.entries.lock().await;
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            event_id: record.event_id,
            user_id: record.user_id,
            organizer_id: record.organizer_id,
            action: record.action,
            // Deterministic strictly-increasing timestamps for sort checks.
            created_at: Utc::now() + Duration::seconds(entries.len() as i64),
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_for_event(&self, event_id: EventId) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.event_id == event_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        action: AuditAction,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.action == action)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn list_for_organizer(
        &self,
        organizer_id: UserId,
        action: AuditAction,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.organizer_id == organizer_id && entry.action == action)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}

fn sample_event(organizer: UserId) -> Event {
    let Ok(draft) = EventDraft::new("t", "d", Utc::now(), "l", "c", 10) else {
        panic!("draft must validate");
    };
    Event::new(EventId::new(), draft, organizer, Utc::now())
}

#[tokio::test]
async fn creation_and_registration_entries_read_newest_first() {
    let repository = Arc::new(FakeAuditLogRepository::default());
    let service = AuditLogService::new(repository);

    let organizer = UserId::new();
    let attendee = UserId::new();
    let event = sample_event(organizer);

    service.record_event_created(&event).await;
    service.record_user_registered(&event, attendee).await;

    let logs = service.event_logs(event.id()).await;
    let Ok(logs) = logs else {
        panic!("listing must succeed");
    };

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].action, AuditAction::UserRegistered);
    assert_eq!(logs[0].user_id, attendee);
    assert_eq!(logs[0].organizer_id, organizer);
    assert_eq!(logs[1].action, AuditAction::EventCreated);
}

#[tokio::test]
async fn failed_append_is_swallowed() {
    let repository = Arc::new(FakeAuditLogRepository {
        fail_appends: true,
        ..FakeAuditLogRepository::default()
    });
    let service = AuditLogService::new(repository.clone());

    let event = sample_event(UserId::new());

    // Must not panic or propagate; the caller's operation already committed.
    service.record_event_created(&event).await;

    assert!(repository.entries.lock().await.is_empty());
}

#[tokio::test]
async fn user_logs_include_organizer_entries_for_organizers_only() {
    let repository = Arc::new(FakeAuditLogRepository::default());
    let service = AuditLogService::new(repository);

    let organizer = UserId::new();
    let attendee = UserId::new();
    let event = sample_event(organizer);

    service.record_event_created(&event).await;
    service.record_user_registered(&event, attendee).await;

    let organizer_identity = UserIdentity::new(
        organizer.as_uuid(),
        "Olga",
        "olga@example.com",
        Role::Organizer,
    );
    let attendee_identity =
        UserIdentity::new(attendee.as_uuid(), "Alice", "alice@example.com", Role::User);

    let organizer_logs = service.user_logs(&organizer_identity).await;
    assert_eq!(
        organizer_logs.map(|logs| logs.len()).ok(),
        Some(1),
        "organizer sees the creation entry for the owned event"
    );

    let attendee_logs = service.user_logs(&attendee_identity).await;
    let Ok(attendee_logs) = attendee_logs else {
        panic!("listing must succeed");
    };
    assert_eq!(attendee_logs.len(), 1);
    assert_eq!(attendee_logs[0].action, AuditAction::UserRegistered);
}
