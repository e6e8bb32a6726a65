//! Admin dashboard handlers.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;

use taskhub_app::ports::{
    CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};
use taskhub_domain::access::{self, Action, Resource};

use crate::auth::current_user;
use crate::error::ApiError;
use crate::state::AppState;

/// Entity counts for the admin dashboard.
#[derive(Serialize)]
pub struct Metrics {
    pub users: u64,
    pub projects: u64,
    pub teams: u64,
    pub tasks: u64,
}

/// `GET /api/admin/metrics`
pub async fn metrics<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
) -> Result<Json<Metrics>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    // Only admins may read user-kind resources, which gates the dashboard.
    access::check(actor.role, actor.id, Action::Read, &Resource::user())
        .map_err(taskhub_domain::error::TaskHubError::from)?;

    Ok(Json(Metrics {
        users: state.user_service.count().await?,
        projects: state.project_service.count().await?,
        teams: state.team_service.count().await?,
        tasks: state.task_service.count().await?,
    }))
}
