use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppError;

/// Closed set of roles a user account can hold.
///
/// Stored and transported as lowercase strings; parsed back through
/// [`FromStr`] so unknown values are rejected at the boundary instead of
/// leaking into policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular attendee account.
    User,
    /// Account allowed to create and manage its own events.
    Organizer,
    /// Account allowed to manage any event.
    Admin,
}

impl Role {
    /// Returns the stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organizer => "organizer",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "organizer" => Ok(Self::Organizer),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Resolved identity attached to every authenticated request.
///
/// Built by the authorization gate after token verification and user
/// re-resolution; downstream services treat it as proof that the user
/// existed when the request started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: Uuid,
    display_name: String,
    email: String,
    role: Role,
}

impl UserIdentity {
    /// Creates a user identity from a verified user record.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        display_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            email: email.into(),
            role,
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the account email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the role carried by the account.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the identity holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Role;

    #[test]
    fn role_round_trips_through_storage_value() {
        for role in [Role::User, Role::Organizer, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()).ok(), Some(role));
        }
    }

    #[test]
    fn role_rejects_unknown_value() {
        assert!(Role::from_str("superuser").is_err());
    }
}
