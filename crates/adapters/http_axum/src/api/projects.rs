//! Project lifecycle handlers.

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
use taskhub_app::services::project_service::{NewProject, ProjectChanges};
use taskhub_domain::error::{TaskHubError, ValidationError};
use taskhub_domain::id::{ProjectId, UserId};
use taskhub_domain::project::{Project, ProjectStatus};

use crate::auth::current_user;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a project.
#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub admin_id: Option<UserId>,
    pub owner_id: Option<UserId>,
}

/// Request body for updating a project; omitted fields are untouched.
#[derive(Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub owner_id: Option<UserId>,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Project>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<ProjectId, ApiError> {
    ProjectId::from_str(raw).map_err(|_| TaskHubError::from(ValidationError::InvalidId).into())
}

/// `GET /api/projects`
pub async fn list<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Project>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let projects = state.project_service.list(&actor).await?;
    Ok(Json(projects))
}

/// `POST /api/projects`
pub async fn create<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
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
    let project = state
        .project_service
        .create(
            &actor,
            NewProject {
                name: req.name,
                description: req.description,
                admin_id: req.admin_id,
                owner_id: req.owner_id,
            },
        )
        .await?;
    Ok(CreateResponse::Created(Json(project)))
}

/// `GET /api/projects/{id}`
pub async fn get<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let project = state.project_service.get(&actor, parse_id(&id)?).await?;
    Ok(Json(project))
}

/// `PUT /api/projects/{id}`
pub async fn update<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let project = state
        .project_service
        .update(
            &actor,
            parse_id(&id)?,
            ProjectChanges {
                name: req.name,
                description: req.description,
                status: req.status,
                owner_id: req.owner_id,
            },
        )
        .await?;
    Ok(Json(project))
}

/// `DELETE /api/projects/{id}`
pub async fn delete<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    state.project_service.delete(&actor, parse_id(&id)?).await?;
    Ok(DeleteResponse::NoContent)
}
