use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use gatherly_application::{UserRecord, UserRepository};
use gatherly_core::{AppError, AppResult, Role};
use gatherly_domain::UserId;
use tokio::sync::RwLock;

/// In-memory user repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Removes a user, for exercising deleted-account token paths in tests.
    pub async fn remove(&self, user_id: UserId) {
        self.users.write().await.remove(&user_id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;

        if users.values().any(|user| user.email == email) {
            return Err(AppError::BusinessRule("user already exists".to_owned()));
        }

        let record = UserRecord {
            id: UserId::new(),
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            role,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;

        if let Some(email) = email
            && users
                .values()
                .any(|user| user.email == email && user.id != user_id)
        {
            return Err(AppError::BusinessRule(
                "email address is already in use".to_owned(),
            ));
        }

        let record = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

        if let Some(name) = name {
            record.name = name.to_owned();
        }
        if let Some(email) = email {
            record.email = email.to_owned();
        }
        if let Some(password_hash) = password_hash {
            record.password_hash = password_hash.to_owned();
        }

        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use gatherly_application::UserRepository;
    use gatherly_core::{AppError, AppResult, Role};

    use super::InMemoryUserRepository;

    #[tokio::test]
    async fn create_enforces_unique_email() -> AppResult<()> {
        let repository = InMemoryUserRepository::new();
        repository
            .create("Alice", "alice@example.com", "hash", Role::User)
            .await?;

        let duplicate = repository
            .create("Impostor", "alice@example.com", "hash", Role::User)
            .await;

        assert!(matches!(duplicate, Err(AppError::BusinessRule(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_profile_keeps_unset_fields() -> AppResult<()> {
        let repository = InMemoryUserRepository::new();
        let record = repository
            .create("Alice", "alice@example.com", "hash", Role::User)
            .await?;

        let updated = repository
            .update_profile(record.id, Some("Alicia"), None, None)
            .await?;

        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, "alice@example.com");
        assert_eq!(updated.password_hash, "hash");
        Ok(())
    }
}
