//! Application services and ports.

#![forbid(unsafe_code)]

mod access_token;
mod audit_log_service;
mod authorization_service;
mod event_service;
mod user_service;

pub use access_token::{AccessTokenClaims, TokenSigner};
pub use audit_log_service::{AuditLogRepository, AuditLogService, AuditRecord};
pub use authorization_service::AuthorizationService;
pub use event_service::{
    AttendeeAppend, CapacityStatus, EventDetails, EventListing, EventRepository, EventService,
    RegistrationReceipt,
};
pub use user_service::{
    AuthSession, PasswordHasher, ProfileUpdateParams, RegisterParams, UserRecord, UserRepository,
    UserService, UserSummary,
};
