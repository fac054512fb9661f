//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod hmac_token_signer;
mod in_memory_audit_log_repository;
mod in_memory_event_repository;
mod in_memory_user_repository;
mod postgres_audit_log_repository;
mod postgres_event_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use hmac_token_signer::HmacTokenSigner;
pub use in_memory_audit_log_repository::InMemoryAuditLogRepository;
pub use in_memory_event_repository::InMemoryEventRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_event_repository::PostgresEventRepository;
pub use postgres_user_repository::PostgresUserRepository;
