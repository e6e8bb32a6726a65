//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taskhub_app::ports::{
    CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the API under `/api` plus a `/health` probe. Includes a
/// [`TraceLayer`] that logs each HTTP request/response at the `DEBUG`
/// level and a permissive [`CorsLayer`] for browser clients.
pub fn build<UR, PR, TR, MR, TK, HS>(state: AppState<UR, PR, TR, MR, TK, HS>) -> Router
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
