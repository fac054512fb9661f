use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use gatherly_core::{AppError, AppResult, Role, UserIdentity};
use gatherly_domain::{
    Admission, AuditAction, AuditLogEntry, Event, EventDraft, EventId, EventPatch, EventQuery,
    UserId,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::audit_log_service::{AuditLogRepository, AuditLogService, AuditRecord};
use crate::user_service::{UserRecord, UserRepository};

use super::{AttendeeAppend, CapacityStatus, EventRepository, EventService};

#[derive(Default)]
struct FakeEventRepository {
    events: Mutex<Vec<Event>>,
}

#[async_trait]
impl EventRepository for FakeEventRepository {
    async fn create(&self, draft: EventDraft, organizer: UserId) -> AppResult<Event> {
        let event = Event::new(EventId::new(), draft, organizer, Utc::now());
        self.events.lock().await.push(event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .find(|event| event.id() == event_id)
            .cloned())
    }

    async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .filter(|event| query.matches(event))
            .cloned()
            .collect())
    }

    async fn list_by_organizer(&self, organizer: UserId) -> AppResult<Vec<Event>> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .filter(|event| event.organizer() == organizer)
            .cloned()
            .collect())
    }

    async fn list_by_attendee(&self, attendee: UserId) -> AppResult<Vec<Event>> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .filter(|event| event.has_attendee(attendee))
            .cloned()
            .collect())
    }

    async fn update_details(&self, updated: &Event) -> AppResult<Event> {
        let mut events = self.events.lock().await;
        let stored = events
            .iter_mut()
            .find(|event| event.id() == updated.id())
            .ok_or_else(|| AppError::NotFound("event not found".to_owned()))?;

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
        let mut events = self.events.lock().await;
        let before = events.len();
        events.retain(|event| event.id() != event_id);

        if events.len() == before {
            return Err(AppError::NotFound("event not found".to_owned()));
        }

        Ok(())
    }

    async fn append_attendee(
        &self,
        event_id: EventId,
        attendee: UserId,
    ) -> AppResult<AttendeeAppend> {
        // One lock scope covers check and append, like the real stores.
        let mut events = self.events.lock().await;
        let stored = events
            .iter_mut()
            .find(|event| event.id() == event_id)
            .ok_or_else(|| AppError::NotFound("event not found".to_owned()))?;

        Ok(match stored.admit(attendee) {
            Admission::Admitted => AttendeeAppend::Appended(stored.clone()),
            Admission::AlreadyRegistered => AttendeeAppend::AlreadyRegistered,
            Admission::HouseFull => AttendeeAppend::HouseFull,
        })
    }
}

#[derive(Default)]
struct FakeUserRepository {
    users: Mutex<Vec<UserRecord>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<UserRecord> {
        let record = UserRecord {
            id: UserId::new(),
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            role,
            created_at: Utc::now(),
        };
        self.users.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_profile(
        &self,
        _user_id: UserId,
        _name: Option<&str>,
        _email: Option<&str>,
        _password_hash: Option<&str>,
    ) -> AppResult<UserRecord> {
        Err(AppError::Internal("not used in these tests".to_owned()))
    }
}

#[derive(Default)]
struct FakeAuditLogRepository {
    entries: Mutex<Vec<AuditLogEntry>>,
    fail_appends: AtomicBool,
}

#[async_trait]
impl AuditLogRepository for FakeAuditLogRepository {
    async fn append(&self, record: AuditRecord) -> AppResult<AuditLogEntry> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(AppError::Internal("audit store down".to_owned()));
        }

        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            event_id: record.event_id,
            user_id: record.user_id,
            organizer_id: record.organizer_id,
            action: record.action,
            created_at: Utc::now(),
        };
        self.entries.lock().await.push(entry.clone());
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
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.action == action)
            .cloned()
            .collect())
    }

    async fn list_for_organizer(
        &self,
        organizer_id: UserId,
        action: AuditAction,
    ) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.organizer_id == organizer_id && entry.action == action)
            .cloned()
            .collect())
    }
}

struct Harness {
    service: EventService,
    audit: Arc<FakeAuditLogRepository>,
}

fn harness() -> Harness {
    let audit = Arc::new(FakeAuditLogRepository::default());
    let service = EventService::new(
        Arc::new(FakeEventRepository::default()),
        Arc::new(FakeUserRepository::default()),
        AuditLogService::new(audit.clone()),
    );
    Harness { service, audit }
}

fn identity(role: Role) -> UserIdentity {
    UserIdentity::new(UserId::new().as_uuid(), "Someone", "someone@example.com", role)
}

fn draft(capacity: u32) -> EventDraft {
    let Ok(draft) = EventDraft::new(
        "RustConf",
        "A conference about Rust",
        Utc::now(),
        "Berlin",
        "tech",
        capacity,
    ) else {
        panic!("draft must validate");
    };
    draft
}

async fn created_event(harness: &Harness, capacity: u32) -> Event {
    let organizer = identity(Role::Organizer);
    let Ok(event) = harness.service.create_event(&organizer, draft(capacity)).await else {
        panic!("event creation must succeed");
    };
    event
}

#[tokio::test]
async fn register_consumes_a_seat_and_recomputes_availability() {
    let harness = harness();
    let event = created_event(&harness, 1).await;

    let receipt = harness
        .service
        .register_attendee(&identity(Role::User), event.id())
        .await;

    let Ok(receipt) = receipt else {
        panic!("registration must succeed");
    };
    assert_eq!(
        receipt.capacity,
        CapacityStatus {
            capacity: 1,
            attendees_count: 1,
            available_seats: 0,
            is_house_full: true,
        }
    );
}

#[tokio::test]
async fn register_on_full_event_fails_and_changes_nothing() {
    let harness = harness();
    let event = created_event(&harness, 1).await;

    let first = harness
        .service
        .register_attendee(&identity(Role::User), event.id())
        .await;
    assert!(first.is_ok());

    let second = harness
        .service
        .register_attendee(&identity(Role::User), event.id())
        .await;
    assert!(matches!(second, Err(AppError::CapacityExceeded(_))));

    let status = harness.service.capacity_status(event.id()).await;
    assert_eq!(status.map(|s| s.attendees_count).ok(), Some(1));
}

#[tokio::test]
async fn repeat_registration_reports_duplicate_not_second_seat() {
    let harness = harness();
    let event = created_event(&harness, 5).await;
    let attendee = identity(Role::User);

    let first = harness.service.register_attendee(&attendee, event.id()).await;
    assert!(first.is_ok());

    let second = harness.service.register_attendee(&attendee, event.id()).await;
    assert!(matches!(second, Err(AppError::BusinessRule(_))));

    let status = harness.service.capacity_status(event.id()).await;
    assert_eq!(status.map(|s| s.attendees_count).ok(), Some(1));
}

#[tokio::test]
async fn organizer_cannot_register_even_with_open_seats() {
    let harness = harness();
    let event = created_event(&harness, 50).await;

    let result = harness
        .service
        .register_attendee(&identity(Role::Organizer), event.id())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn admin_may_register() {
    let harness = harness();
    let event = created_event(&harness, 50).await;

    let result = harness
        .service
        .register_attendee(&identity(Role::Admin), event.id())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn missing_event_answers_before_the_role_rule() {
    let harness = harness();

    let result = harness
        .service
        .register_attendee(&identity(Role::Organizer), EventId::new())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn registration_survives_audit_append_failure() {
    let harness = harness();
    let event = created_event(&harness, 3).await;
    harness.audit.fail_appends.store(true, Ordering::SeqCst);

    let receipt = harness
        .service
        .register_attendee(&identity(Role::User), event.id())
        .await;

    assert!(receipt.is_ok());
}

#[tokio::test]
async fn create_event_requires_organizer_or_admin_role() {
    let harness = harness();

    let result = harness
        .service
        .create_event(&identity(Role::User), draft(10))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn create_event_appends_creation_audit_entry() {
    let harness = harness();
    let event = created_event(&harness, 10).await;

    let entries = harness.audit.entries.lock().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::EventCreated);
    assert_eq!(entries[0].event_id, event.id());
    assert_eq!(entries[0].organizer_id, event.organizer());
}

#[tokio::test]
async fn registration_audit_entry_names_actor_and_owner() {
    let harness = harness();
    let event = created_event(&harness, 10).await;
    let attendee = identity(Role::User);

    let receipt = harness.service.register_attendee(&attendee, event.id()).await;
    assert!(receipt.is_ok());

    let entries = harness.audit.entries.lock().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].action, AuditAction::UserRegistered);
    assert_eq!(entries[1].user_id.as_uuid(), attendee.user_id());
    assert_eq!(entries[1].organizer_id, event.organizer());
}

#[tokio::test]
async fn non_owner_organizer_cannot_update_another_organizers_event() {
    let harness = harness();
    let event = created_event(&harness, 10).await;

    let patch = EventPatch {
        title: Some("Hijacked".to_owned()),
        ..EventPatch::default()
    };
    let result = harness
        .service
        .update_event(&identity(Role::Organizer), event.id(), patch)
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn admin_may_update_any_event() {
    let harness = harness();
    let event = created_event(&harness, 10).await;

    let patch = EventPatch {
        title: Some("Rescheduled".to_owned()),
        ..EventPatch::default()
    };
    let result = harness
        .service
        .update_event(&identity(Role::Admin), event.id(), patch)
        .await;

    assert_eq!(result.map(|e| e.title().to_owned()).ok().as_deref(), Some("Rescheduled"));
}

#[tokio::test]
async fn non_owner_organizer_cannot_delete_or_view_logs() {
    let harness = harness();
    let event = created_event(&harness, 10).await;
    let stranger = identity(Role::Organizer);

    let deleted = harness.service.delete_event(&stranger, event.id()).await;
    assert!(matches!(deleted, Err(AppError::Forbidden(_))));

    let logs = harness.service.view_event_logs(&stranger, event.id()).await;
    assert!(matches!(logs, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn seats_plus_attendees_equal_capacity_after_every_mutation() {
    let harness = harness();
    let event = created_event(&harness, 3).await;

    for _ in 0..5 {
        let _ = harness
            .service
            .register_attendee(&identity(Role::User), event.id())
            .await;

        let Ok(status) = harness.service.capacity_status(event.id()).await else {
            panic!("status must resolve");
        };
        assert_eq!(status.available_seats + status.attendees_count, status.capacity);
        assert_eq!(status.is_house_full, status.available_seats == 0);
    }
}
