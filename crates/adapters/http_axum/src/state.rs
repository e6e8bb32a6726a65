//! Shared application state for axum handlers.

use std::sync::Arc;

use taskhub_app::hub::ProjectHub;
use taskhub_app::ports::{
    CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};
use taskhub_app::services::auth_service::AuthService;
use taskhub_app::services::project_service::ProjectService;
use taskhub_app::services::task_service::TaskService;
use taskhub_app::services::team_service::TeamService;
use taskhub_app::services::user_service::UserService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository and credential types to avoid dynamic
/// dispatch; all services publish through the shared [`ProjectHub`], which
/// is also kept directly so the WebSocket endpoint can subscribe.
/// `Clone` is implemented manually so the underlying types themselves do
/// not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<UR, PR, TR, MR, TK, HS> {
    /// Registration, login, and token-to-actor resolution.
    pub auth_service: Arc<AuthService<UR, TK, HS>>,
    /// Admin user management.
    pub user_service: Arc<UserService<UR>>,
    /// Project lifecycle.
    pub project_service: Arc<ProjectService<PR, MR, UR, Arc<ProjectHub>>>,
    /// Task lifecycle.
    pub task_service: Arc<TaskService<TR, PR, MR, UR, Arc<ProjectHub>>>,
    /// Team lifecycle and membership.
    pub team_service: Arc<TeamService<MR, PR, UR, Arc<ProjectHub>>>,
    /// Per-project live-subscription registry.
    pub hub: Arc<ProjectHub>,
}

impl<UR, PR, TR, MR, TK, HS> Clone for AppState<UR, PR, TR, MR, TK, HS> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            user_service: Arc::clone(&self.user_service),
            project_service: Arc::clone(&self.project_service),
            task_service: Arc::clone(&self.task_service),
            team_service: Arc::clone(&self.team_service),
            hub: Arc::clone(&self.hub),
        }
    }
}

impl<UR, PR, TR, MR, TK, HS> AppState<UR, PR, TR, MR, TK, HS>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        auth_service: AuthService<UR, TK, HS>,
        user_service: UserService<UR>,
        project_service: ProjectService<PR, MR, UR, Arc<ProjectHub>>,
        task_service: TaskService<TR, PR, MR, UR, Arc<ProjectHub>>,
        team_service: TeamService<MR, PR, UR, Arc<ProjectHub>>,
        hub: Arc<ProjectHub>,
    ) -> Self {
        Self {
            auth_service: Arc::new(auth_service),
            user_service: Arc::new(user_service),
            project_service: Arc::new(project_service),
            task_service: Arc::new(task_service),
            team_service: Arc::new(team_service),
            hub,
        }
    }
}
