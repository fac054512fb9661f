use gatherly_application::{AuditLogService, AuthorizationService, EventService, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub event_service: EventService,
    pub user_service: UserService,
    pub authorization_service: AuthorizationService,
    pub audit_log_service: AuditLogService,
}
