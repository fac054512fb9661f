use gatherly_core::{AppError, NonEmptyString};
use gatherly_domain::{EmailAddress, validate_password};

use super::*;

impl UserService {
    /// Applies profile edits and returns a session with a fresh token.
    ///
    /// Role is deliberately not editable here. An email change is checked
    /// against the unique index before the write; the repository enforces
    /// it again underneath.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        params: ProfileUpdateParams,
    ) -> AppResult<AuthSession> {
        let name = params
            .name
            .map(NonEmptyString::new)
            .transpose()?;

        let email = params
            .email
            .map(EmailAddress::new)
            .transpose()?;

        if let Some(email) = &email
            && let Some(other) = self.user_repository.find_by_email(email.as_str()).await?
            && other.id != user_id
        {
            return Err(AppError::BusinessRule(
                "email address is already in use".to_owned(),
            ));
        }

        let password_hash = match params.password {
            Some(password) => {
                validate_password(&password)?;
                Some(self.password_hasher.hash_password(&password)?)
            }
            None => None,
        };

        let record = self
            .user_repository
            .update_profile(
                user_id,
                name.as_ref().map(NonEmptyString::as_str),
                email.as_ref().map(EmailAddress::as_str),
                password_hash.as_deref(),
            )
            .await?;

        self.issue_session(record)
    }
}
