//! Team lifecycle and membership handlers.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use taskhub_app::ports::{
    CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};
use taskhub_app::services::team_service::NewTeam;
use taskhub_domain::error::{TaskHubError, ValidationError};
use taskhub_domain::id::{ProjectId, TeamId, UserId};
use taskhub_domain::team::Team;

use crate::auth::current_user;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a team.
#[derive(Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub project_id: ProjectId,
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub member_ids: Vec<UserId>,
}

/// Request body for adding a member.
#[derive(Deserialize)]
pub struct AddMemberRequest {
    pub user_id: UserId,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Team>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<TeamId, ApiError> {
    TeamId::from_str(raw).map_err(|_| TaskHubError::from(ValidationError::InvalidId).into())
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::from_str(raw).map_err(|_| TaskHubError::from(ValidationError::InvalidId).into())
}

/// `GET /api/teams`
pub async fn list<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Team>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let teams = state.team_service.list(&actor).await?;
    Ok(Json(teams))
}

/// `POST /api/teams`
pub async fn create<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Json(req): Json<CreateTeamRequest>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let team = state
        .team_service
        .create(
            &actor,
            NewTeam {
                name: req.name,
                project_id: req.project_id,
                owner_id: req.owner_id,
                member_ids: req.member_ids,
            },
        )
        .await?;
    Ok(CreateResponse::Created(Json(team)))
}

/// `GET /api/teams/{id}`
pub async fn get<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Team>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let team = state.team_service.get(&actor, parse_id(&id)?).await?;
    Ok(Json(team))
}

/// `POST /api/teams/{id}/members`
pub async fn add_member<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<Team>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let team = state
        .team_service
        .add_member(&actor, parse_id(&id)?, req.user_id)
        .await?;
    Ok(Json(team))
}

/// `DELETE /api/teams/{id}/members/{user_id}`
pub async fn remove_member<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<Team>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let team = state
        .team_service
        .remove_member(&actor, parse_id(&id)?, parse_user_id(&user_id)?)
        .await?;
    Ok(Json(team))
}
