//! # taskhubd — taskhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`taskhub.toml` + env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Start the notification worker and the per-project event hub
//! - Build the axum router, injecting application services
//! - Bind to a TCP port, serve, and shut down gracefully on Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use std::sync::Arc;

use taskhub_adapter_auth_jwt::{Argon2Hasher, JwtCodec};
use taskhub_adapter_http_axum::state::AppState;
use taskhub_adapter_storage_sqlite_sqlx::{
    SqliteProjectRepository, SqliteTaskRepository, SqliteTeamRepository, SqliteUserRepository,
};
use taskhub_app::hub::ProjectHub;
use taskhub_app::notify::{LogMailer, spawn_worker};
use taskhub_app::services::auth_service::AuthService;
use taskhub_app::services::project_service::ProjectService;
use taskhub_app::services::task_service::TaskService;
use taskhub_app::services::team_service::TeamService;
use taskhub_app::services::user_service::UserService;

mod config;

const HUB_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = taskhub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let user_repo = SqliteUserRepository::new(pool.clone());
    let project_repo = SqliteProjectRepository::new(pool.clone());
    let task_repo = SqliteTaskRepository::new(pool.clone());
    let team_repo = SqliteTeamRepository::new(pool);

    // Live-event hub and notification worker
    let hub = Arc::new(ProjectHub::new(HUB_CAPACITY));
    let (outbox, _notify_worker) = spawn_worker(LogMailer);

    // Credentials
    let codec = JwtCodec::new(&config.auth.jwt_secret, config.auth.token_ttl_minutes);
    let hasher = Argon2Hasher;

    // Services
    let auth_service = AuthService::new(user_repo.clone(), codec, hasher);
    let user_service = UserService::new(user_repo.clone());
    let project_service = ProjectService::new(
        project_repo.clone(),
        team_repo.clone(),
        user_repo.clone(),
        Arc::clone(&hub),
    );
    let task_service = TaskService::new(
        task_repo,
        project_repo.clone(),
        team_repo.clone(),
        user_repo.clone(),
        Arc::clone(&hub),
        outbox,
    );
    let team_service = TeamService::new(team_repo, project_repo, user_repo, Arc::clone(&hub));

    // HTTP
    let state = AppState::new(
        auth_service,
        user_service,
        project_service,
        task_service,
        team_service,
        hub,
    );
    let app = taskhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "taskhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
