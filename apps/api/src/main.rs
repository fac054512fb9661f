//! Gatherly API composition root.

#![forbid(unsafe_code)]

mod auth;
mod dto;
mod error;
mod handlers;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use chrono::Duration;
use gatherly_application::{AuditLogService, AuthorizationService, EventService, UserService};
use gatherly_core::AppError;
use gatherly_infrastructure::{
    Argon2PasswordHasher, HmacTokenSigner, PostgresAuditLogRepository, PostgresEventRepository,
    PostgresUserRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let token_secret = required_env("AUTH_TOKEN_SECRET")?;
    let token_ttl_seconds = env::var("AUTH_TOKEN_TTL_SECONDS")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(3600);
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let token_signer = Arc::new(HmacTokenSigner::new(&token_secret)?);
    let password_hasher = Arc::new(Argon2PasswordHasher::new());

    let event_repository = Arc::new(PostgresEventRepository::new(pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let audit_log_service = AuditLogService::new(Arc::new(PostgresAuditLogRepository::new(
        pool.clone(),
    )));

    let app_state = AppState {
        event_service: EventService::new(
            event_repository,
            user_repository.clone(),
            audit_log_service.clone(),
        ),
        user_service: UserService::new(
            user_repository.clone(),
            password_hasher,
            token_signer.clone(),
            Duration::seconds(token_ttl_seconds),
        ),
        authorization_service: AuthorizationService::new(user_repository, token_signer),
        audit_log_service,
    };

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let app = Router::new()
        .route("/api/health", get(handlers::health::health_handler))
        .route(
            "/api/events",
            get(handlers::events::list_events_handler)
                .post(handlers::events::create_event_handler),
        )
        .route(
            "/api/events/{event_id}",
            get(handlers::events::event_details_handler)
                .patch(handlers::events::update_event_handler)
                .delete(handlers::events::delete_event_handler),
        )
        .route(
            "/api/events/{event_id}/register",
            post(handlers::events::register_event_handler),
        )
        .route(
            "/api/events/{event_id}/capacity",
            get(handlers::events::event_capacity_handler),
        )
        .route(
            "/api/events/{event_id}/logs",
            get(handlers::events::event_logs_handler),
        )
        .route(
            "/api/users/register",
            post(handlers::users::register_user_handler),
        )
        .route("/api/users/login", post(handlers::users::login_handler))
        .route(
            "/api/users/profile",
            get(handlers::users::profile_handler).patch(handlers::users::update_profile_handler),
        )
        .route("/api/users/logs", get(handlers::users::user_logs_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "gatherly-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
