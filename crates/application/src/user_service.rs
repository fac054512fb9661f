//! User account ports and application service.
//!
//! Owns the account lifecycle: registration, login, and profile edits.
//! Follows OWASP guidance on generic error messages so responses never
//! reveal whether an email address has an account.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use gatherly_core::{AppError, AppResult, Role};
use gatherly_domain::UserId;

use crate::access_token::{AccessTokenClaims, TokenSigner};

mod login;
mod profile;
mod registration;


// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
///
/// The password hash stays inside the application layer; only
/// [`UserSummary`] values cross the HTTP boundary.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Canonical lowercase email address.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Role fixed at registration.
    pub role: Role,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (stored lowercase, so pass a canonical value).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Creates a new user record with a server-assigned id and timestamp.
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<UserRecord>;

    /// Applies profile changes. `None` fields keep their current value.
    async fn update_profile(
        &self,
        user_id: UserId,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> AppResult<UserRecord>;
}

/// Port for password hashing operations. Keeps the application layer free
/// of direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Read models and request types
// ---------------------------------------------------------------------------

/// User fields safe to return in responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account role.
    pub role: Role,
}

impl From<UserRecord> for UserSummary {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            role: record.role,
        }
    }
}

/// An authenticated session: the account summary plus a fresh bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The account the token belongs to.
    pub user: UserSummary,
    /// Signed bearer token for subsequent requests.
    pub token: String,
}

/// Parameters for user registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    /// Display name for the new account.
    pub name: String,
    /// Email address for the new account.
    pub email: String,
    /// Plaintext password (validated against OWASP rules).
    pub password: String,
    /// Requested role; defaults to `user` when absent.
    pub role: Option<Role>,
}

/// Parameters for a profile edit. `None` fields stay unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdateParams {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement plaintext password.
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for user accounts and credentials.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_signer: Arc<dyn TokenSigner>,
    token_ttl: Duration,
}

impl UserService {
    /// Creates a new user service. `token_ttl` bounds every issued token.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_signer: Arc<dyn TokenSigner>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_signer,
            token_ttl,
        }
    }

    /// Returns the profile summary for an existing account.
    pub async fn profile(&self, user_id: UserId) -> AppResult<UserSummary> {
        let record = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

        Ok(UserSummary::from(record))
    }

    /// Signs a fresh token for the record and bundles the session.
    fn issue_session(&self, record: UserRecord) -> AppResult<AuthSession> {
        let claims =
            AccessTokenClaims::new(record.id, record.role, Utc::now() + self.token_ttl);
        let token = self.token_signer.sign(&claims)?;

        Ok(AuthSession {
            user: UserSummary::from(record),
            token,
        })
    }
}
