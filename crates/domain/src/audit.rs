//! Append-only audit trail records.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use gatherly_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EventId, UserId};

/// Stable audit actions emitted around the event lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when an organizer creates an event.
    EventCreated,
    /// Emitted when a user takes a seat on an event.
    UserRegistered,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventCreated => "event_created",
            Self::UserRegistered => "user_registered",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "event_created" => Ok(Self::EventCreated),
            "user_registered" => Ok(Self::UserRegistered),
            _ => Err(AppError::Validation(format!(
                "unknown audit action value '{value}'"
            ))),
        }
    }
}

/// One immutable audit record.
///
/// Written once after the primary state change commits; never updated or
/// deleted. `user_id` is the actor, `organizer_id` the owner of the event
/// the action touched (for `event_created` the two coincide).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Stable entry identifier.
    pub id: Uuid,
    /// Event the action touched.
    pub event_id: EventId,
    /// User who performed the action.
    pub user_id: UserId,
    /// Owner of the touched event.
    pub organizer_id: UserId,
    /// What happened.
    pub action: AuditAction,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}
