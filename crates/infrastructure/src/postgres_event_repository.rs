//! PostgreSQL-backed event repository.
//!
//! The attendee append runs as one guarded `UPDATE` statement, so the
//! duplicate check, the capacity check, and the append are atomic against
//! concurrent registrations for the same event. A follow-up read only
//! classifies a refusal; it never participates in the decision.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use gatherly_application::{AttendeeAppend, EventRepository};
use gatherly_core::{AppError, AppResult};
use gatherly_domain::{Event, EventDraft, EventId, EventQuery, UserId};


/// PostgreSQL implementation of the event repository port.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: uuid::Uuid,
    title: String,
    description: String,
    date: chrono::DateTime<chrono::Utc>,
    location: String,
    category: String,
    capacity: i32,
    organizer_id: uuid::Uuid,
    attendees: Vec<uuid::Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let capacity = u32::try_from(row.capacity).map_err(|_| {
            AppError::Internal(format!("stored capacity {} is out of range", row.capacity))
        })?;

        let draft = EventDraft::new(
            row.title,
            row.description,
            row.date,
            row.location,
            row.category,
            capacity,
        )?;

        Ok(Event::restore(
            EventId::from_uuid(row.id),
            draft,
            UserId::from_uuid(row.organizer_id),
            row.attendees.into_iter().map(UserId::from_uuid).collect(),
            row.created_at,
        ))
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn create(&self, draft: EventDraft, organizer: UserId) -> AppResult<Event> {
        // The draft's fields travel through a throwaway Event value; the
        // stored created_at is server-assigned and read back from the row.
        let event = Event::new(EventId::new(), draft, organizer, Utc::now());
        let capacity = i32::try_from(event.capacity()).map_err(|_| {
            AppError::Validation("event capacity is too large".to_owned())
        })?;

        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, title, description, date, location, category, capacity, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, date, location, category, capacity,
                organizer_id, attendees, created_at
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.title())
        .bind(event.description())
        .bind(event.date())
        .bind(event.location())
        .bind(event.category())
        .bind(capacity)
        .bind(event.organizer().as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create event: {error}")))?;

        Event::try_from(row)
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, date, location, category, capacity,
                organizer_id, attendees, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find event: {error}")))?;

        row.map(Event::try_from).transpose()
    }

    async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        let location_pattern = query
            .location
            .as_ref()
            .map(|location| format!("%{}%", escape_like(location)));

        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, date, location, category, capacity,
                organizer_id, attendees, created_at
            FROM events
            WHERE ($1::TEXT IS NULL OR category = $1)
                AND ($2::TEXT IS NULL OR location ILIKE $2)
                AND ($3::TIMESTAMPTZ IS NULL OR date >= $3)
            ORDER BY date
            "#,
        )
        .bind(query.category.as_deref())
        .bind(location_pattern)
        .bind(query.date_from)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list events: {error}")))?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn list_by_organizer(&self, organizer: UserId) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, date, location, category, capacity,
                organizer_id, attendees, created_at
            FROM events
            WHERE organizer_id = $1
            ORDER BY date
            "#,
        )
        .bind(organizer.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list events by organizer: {error}"))
        })?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn list_by_attendee(&self, attendee: UserId) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, date, location, category, capacity,
                organizer_id, attendees, created_at
            FROM events
            WHERE attendees @> ARRAY[$1]::UUID[]
            ORDER BY date
            "#,
        )
        .bind(attendee.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list events by attendee: {error}"))
        })?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn update_details(&self, event: &Event) -> AppResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET title = $2, description = $3, date = $4, location = $5, category = $6
            WHERE id = $1
            RETURNING id, title, description, date, location, category, capacity,
                organizer_id, attendees, created_at
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.title())
        .bind(event.description())
        .bind(event.date())
        .bind(event.location())
        .bind(event.category())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update event: {error}")))?
        .ok_or_else(|| AppError::NotFound("event not found".to_owned()))?;

        Event::try_from(row)
    }

    async fn delete(&self, event_id: EventId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete event: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("event not found".to_owned()));
        }

        Ok(())
    }

    async fn append_attendee(
        &self,
        event_id: EventId,
        attendee: UserId,
    ) -> AppResult<AttendeeAppend> {
        // The critical section. Both guards and the append live in one
        // statement; rows that fail either guard are left untouched.
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET attendees = array_append(attendees, $2)
            WHERE id = $1
                AND NOT (attendees @> ARRAY[$2]::UUID[])
                AND cardinality(attendees) < capacity
            RETURNING id, title, description, date, location, category, capacity,
                organizer_id, attendees, created_at
            "#,
        )
        .bind(event_id.as_uuid())
        .bind(attendee.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append attendee: {error}")))?;

        if let Some(row) = row {
            return Ok(AttendeeAppend::Appended(Event::try_from(row)?));
        }

        // The guarded update matched nothing. Attendees are never removed,
        // so the re-read classification cannot go stale.
        let refused = self
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("event not found".to_owned()))?;

        if refused.has_attendee(attendee) {
            return Ok(AttendeeAppend::AlreadyRegistered);
        }

        Ok(AttendeeAppend::HouseFull)
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
