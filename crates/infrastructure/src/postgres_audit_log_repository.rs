//! PostgreSQL-backed audit log repository.
//!
//! The table is append-only: this adapter issues inserts and newest-first
//! reads, nothing else.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use gatherly_application::{AuditLogRepository, AuditRecord};
use gatherly_core::{AppError, AppResult};
use gatherly_domain::{AuditAction, AuditLogEntry, EventId, UserId};

/// PostgreSQL implementation of the audit log repository port.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuditLogRow {
    id: uuid::Uuid,
    event_id: uuid::Uuid,
    user_id: uuid::Uuid,
    organizer_id: uuid::Uuid,
    action: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<AuditLogRow> for AuditLogEntry {
    type Error = AppError;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            event_id: EventId::from_uuid(row.event_id),
            user_id: UserId::from_uuid(row.user_id),
            organizer_id: UserId::from_uuid(row.organizer_id),
            action: AuditAction::from_str(row.action.as_str())?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn append(&self, record: AuditRecord) -> AppResult<AuditLogEntry> {
        let row = sqlx::query_as::<_, AuditLogRow>(
            r#"
            INSERT INTO audit_log_entries (id, event_id, user_id, organizer_id, action)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, event_id, user_id, organizer_id, action, created_at
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(record.event_id.as_uuid())
        .bind(record.user_id.as_uuid())
        .bind(record.organizer_id.as_uuid())
        .bind(record.action.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to append audit log entry: {error}"))
        })?;

        AuditLogEntry::try_from(row)
    }

    async fn list_for_event(&self, event_id: EventId) -> AppResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT id, event_id, user_id, organizer_id, action, created_at
            FROM audit_log_entries
            WHERE event_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(event_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list audit log entries: {error}"))
        })?;

        rows.into_iter().map(AuditLogEntry::try_from).collect()
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        action: AuditAction,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT id, event_id, user_id, organizer_id, action, created_at
            FROM audit_log_entries
            WHERE user_id = $1 AND action = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(action.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list audit log entries: {error}"))
        })?;

        rows.into_iter().map(AuditLogEntry::try_from).collect()
    }

    async fn list_for_organizer(
        &self,
        organizer_id: UserId,
        action: AuditAction,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT id, event_id, user_id, organizer_id, action, created_at
            FROM audit_log_entries
            WHERE organizer_id = $1 AND action = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(organizer_id.as_uuid())
        .bind(action.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list audit log entries: {error}"))
        })?;

        rows.into_iter().map(AuditLogEntry::try_from).collect()
    }
}
