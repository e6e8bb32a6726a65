//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod admin;
#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod projects;
#[allow(clippy::missing_errors_doc)]
pub mod tasks;
#[allow(clippy::missing_errors_doc)]
pub mod teams;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use axum::Router;
use axum::routing::{delete, get, patch, post};

use taskhub_app::ports::{
    CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<UR, PR, TR, MR, TK, HS>() -> Router<AppState<UR, PR, TR, MR, TK, HS>>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    Router::new()
        // Identity
        .route(
            "/auth/register",
            post(auth::register::<UR, PR, TR, MR, TK, HS>),
        )
        .route("/auth/login", post(auth::login::<UR, PR, TR, MR, TK, HS>))
        // Users
        .route("/users/me", get(users::me::<UR, PR, TR, MR, TK, HS>))
        .route("/users", get(users::list::<UR, PR, TR, MR, TK, HS>))
        .route(
            "/users/{id}/role",
            patch(users::change_role::<UR, PR, TR, MR, TK, HS>),
        )
        .route(
            "/users/{id}/active",
            patch(users::set_active::<UR, PR, TR, MR, TK, HS>),
        )
        // Admin dashboard
        .route(
            "/admin/metrics",
            get(admin::metrics::<UR, PR, TR, MR, TK, HS>),
        )
        // Projects
        .route(
            "/projects",
            get(projects::list::<UR, PR, TR, MR, TK, HS>)
                .post(projects::create::<UR, PR, TR, MR, TK, HS>),
        )
        .route(
            "/projects/{id}",
            get(projects::get::<UR, PR, TR, MR, TK, HS>)
                .put(projects::update::<UR, PR, TR, MR, TK, HS>)
                .delete(projects::delete::<UR, PR, TR, MR, TK, HS>),
        )
        .route(
            "/projects/{id}/tasks",
            get(tasks::list_by_project::<UR, PR, TR, MR, TK, HS>),
        )
        .route(
            "/projects/{id}/ws",
            get(crate::ws::subscribe::<UR, PR, TR, MR, TK, HS>),
        )
        // Tasks
        .route(
            "/tasks",
            get(tasks::list::<UR, PR, TR, MR, TK, HS>)
                .post(tasks::create::<UR, PR, TR, MR, TK, HS>),
        )
        .route(
            "/tasks/{id}",
            get(tasks::get::<UR, PR, TR, MR, TK, HS>)
                .put(tasks::update::<UR, PR, TR, MR, TK, HS>)
                .delete(tasks::delete::<UR, PR, TR, MR, TK, HS>),
        )
        .route(
            "/tasks/{id}/status",
            patch(tasks::update_status::<UR, PR, TR, MR, TK, HS>),
        )
        // Teams
        .route(
            "/teams",
            get(teams::list::<UR, PR, TR, MR, TK, HS>)
                .post(teams::create::<UR, PR, TR, MR, TK, HS>),
        )
        .route("/teams/{id}", get(teams::get::<UR, PR, TR, MR, TK, HS>))
        .route(
            "/teams/{id}/members",
            post(teams::add_member::<UR, PR, TR, MR, TK, HS>),
        )
        .route(
            "/teams/{id}/members/{user_id}",
            delete(teams::remove_member::<UR, PR, TR, MR, TK, HS>),
        )
}
