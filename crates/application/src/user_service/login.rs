use gatherly_core::AppError;
use gatherly_domain::EmailAddress;

use super::*;

impl UserService {
    /// Authenticates with email and password.
    ///
    /// Any failure (unknown email, wrong password) yields the same generic
    /// message to prevent account enumeration, and the unknown-email path
    /// still performs a hash so both paths take comparable time.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = EmailAddress::new(email)?;

        let Some(record) = self.user_repository.find_by_email(email.as_str()).await? else {
            let _ = self.password_hasher.hash_password(password);
            return Err(invalid_credentials());
        };

        if !self
            .password_hasher
            .verify_password(password, &record.password_hash)?
        {
            return Err(invalid_credentials());
        }

        self.issue_session(record)
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("invalid email or password".to_owned())
}
