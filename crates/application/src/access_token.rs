//! Signed bearer-token claims and the signing port.

use chrono::{DateTime, Utc};
use gatherly_core::{AppResult, Role};
use gatherly_domain::UserId;
use serde::{Deserialize, Serialize};

/// Claims carried inside a signed bearer token.
///
/// The role claim is an optimization for clients; the authorization gate
/// re-fetches the user record on every request, so a stale role or a
/// deleted account can never ride in on an old token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    user_id: UserId,
    role: Role,
    expires_at: DateTime<Utc>,
}

impl AccessTokenClaims {
    /// Creates claims for a user with an absolute expiry.
    #[must_use]
    pub fn new(user_id: UserId, role: Role, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            role,
            expires_at,
        }
    }

    /// Returns the token subject.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role embedded at signing time.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the absolute expiry timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns whether the claims are expired at the given instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Port for issuing and verifying signed bearer tokens.
///
/// `verify` fails closed: malformed input, a bad signature, and an expired
/// token all yield `AppError::Unauthorized`, never a default identity.
pub trait TokenSigner: Send + Sync {
    /// Signs the claims into an opaque token string.
    fn sign(&self, claims: &AccessTokenClaims) -> AppResult<String>;

    /// Verifies a token string and returns the embedded claims.
    fn verify(&self, token: &str) -> AppResult<AccessTokenClaims>;
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use gatherly_core::Role;
    use gatherly_domain::UserId;

    use super::AccessTokenClaims;

    #[test]
    fn claims_expire_at_the_boundary() {
        let now = Utc::now();
        let claims = AccessTokenClaims::new(UserId::new(), Role::User, now);
        assert!(claims.is_expired_at(now));
        assert!(!claims.is_expired_at(now - Duration::seconds(1)));
    }
}
