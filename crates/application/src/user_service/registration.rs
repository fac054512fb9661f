use gatherly_core::{AppError, NonEmptyString, Role};
use gatherly_domain::{EmailAddress, validate_password};

use super::*;

impl UserService {
    /// Registers a new account and returns a ready-to-use session.
    ///
    /// The requested role is honored as-is; there is no role-change
    /// endpoint, so what an account registers as is what it stays.
    pub async fn register(&self, params: RegisterParams) -> AppResult<AuthSession> {
        let name = NonEmptyString::new(params.name)?;
        let email = EmailAddress::new(&params.email)?;
        validate_password(&params.password)?;

        let existing = self.user_repository.find_by_email(email.as_str()).await?;

        if existing.is_some() {
            // Hash anyway so the duplicate path costs the same as success.
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AppError::BusinessRule("user already exists".to_owned()));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let record = self
            .user_repository
            .create(
                name.as_str(),
                email.as_str(),
                &password_hash,
                params.role.unwrap_or(Role::User),
            )
            .await?;

        self.issue_session(record)
    }
}
