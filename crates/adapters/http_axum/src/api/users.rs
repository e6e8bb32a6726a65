//! User management handlers (admin-gated, plus `/users/me`).

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde::Deserialize;

use taskhub_app::ports::{
    CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};
use taskhub_domain::error::{TaskHubError, ValidationError};
use taskhub_domain::id::UserId;
use taskhub_domain::role::Role;
use taskhub_domain::user::User;

use crate::auth::current_user;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for changing a user's role.
#[derive(Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// Request body for activating or deactivating an account.
#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::from_str(raw).map_err(|_| TaskHubError::from(ValidationError::InvalidId).into())
}

/// `GET /api/users/me`
pub async fn me<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
) -> Result<Json<User>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    Ok(Json(actor))
}

/// `GET /api/users`
pub async fn list<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let users = state.user_service.list(&actor).await?;
    Ok(Json(users))
}

/// `PATCH /api/users/{id}/role`
pub async fn change_role<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<User>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let id = parse_id(&id)?;
    let user = state.user_service.change_role(&actor, id, req.role).await?;
    Ok(Json(user))
}

/// `PATCH /api/users/{id}/active`
pub async fn set_active<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<User>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let id = parse_id(&id)?;
    let user = state
        .user_service
        .set_active(&actor, id, req.is_active)
        .await?;
    Ok(Json(user))
}
