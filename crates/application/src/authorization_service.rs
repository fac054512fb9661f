//! Bearer-token authorization gate.
//!
//! Resolves a caller identity from a signed token and enforces role and
//! ownership policy for mutating operations. Every check fails closed.

use std::sync::Arc;

use gatherly_core::{AppError, AppResult, Role, UserIdentity};
use gatherly_domain::Event;

use crate::access_token::TokenSigner;
use crate::user_service::UserRepository;


/// Application service that turns bearer credentials into identities and
/// answers policy questions about them.
#[derive(Clone)]
pub struct AuthorizationService {
    user_repository: Arc<dyn UserRepository>,
    token_signer: Arc<dyn TokenSigner>,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_signer: Arc<dyn TokenSigner>,
    ) -> Self {
        Self {
            user_repository,
            token_signer,
        }
    }

    /// Resolves a verified identity from a bearer token.
    ///
    /// Signature and expiry checks happen in the signer; on top of that the
    /// current user record is re-fetched, so a token whose subject was
    /// deleted is rejected. The returned identity carries the record's
    /// current role, not the role claim baked into the token.
    pub async fn authenticate(&self, token: &str) -> AppResult<UserIdentity> {
        let claims = self.token_signer.verify(token)?;

        let record = self
            .user_repository
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "the user belonging to this token no longer exists".to_owned(),
                )
            })?;

        Ok(UserIdentity::new(
            record.id.as_uuid(),
            record.name,
            record.email,
            record.role,
        ))
    }

    /// Ensures the identity holds one of the allowed roles.
    pub fn require_role(identity: &UserIdentity, allowed: &[Role]) -> AppResult<()> {
        if allowed.contains(&identity.role()) {
            return Ok(());
        }

        Err(AppError::Forbidden(
            "you do not have permission to perform this action".to_owned(),
        ))
    }

    /// Ensures the identity owns the event or holds the admin role.
    ///
    /// `action` names the attempted operation for the refusal message,
    /// e.g. "update" or "delete".
    pub fn require_owner_or_admin(
        identity: &UserIdentity,
        event: &Event,
        action: &str,
    ) -> AppResult<()> {
        if identity.is_admin() || event.organizer().as_uuid() == identity.user_id() {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "you are not authorized to {action} this event"
        )))
    }
}
