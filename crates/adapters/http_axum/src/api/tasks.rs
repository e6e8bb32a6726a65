//! Task lifecycle handlers.

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
use taskhub_app::services::task_service::{NewTask, TaskChanges};
use taskhub_domain::error::{TaskHubError, ValidationError};
use taskhub_domain::id::{ProjectId, TaskId, UserId};
use taskhub_domain::task::{Task, TaskStatus};

use crate::auth::current_user;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a task.
#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to in-progress when omitted.
    pub status: Option<TaskStatus>,
    pub project_id: ProjectId,
    pub assigned_to_id: Option<UserId>,
}

/// Request body for updating a task; omitted fields are untouched.
#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to_id: Option<UserId>,
}

/// Request body for the status-only update.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Task>),
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

fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
    TaskId::from_str(raw).map_err(|_| TaskHubError::from(ValidationError::InvalidId).into())
}

/// `GET /api/tasks`
pub async fn list<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Task>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let tasks = state.task_service.list(&actor).await?;
    Ok(Json(tasks))
}

/// `GET /api/projects/{id}/tasks`
pub async fn list_by_project<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let project_id = ProjectId::from_str(&id)
        .map_err(|_| TaskHubError::from(ValidationError::InvalidId))?;
    let tasks = state
        .task_service
        .list_by_project(&actor, project_id)
        .await?;
    Ok(Json(tasks))
}

/// `POST /api/tasks`
pub async fn create<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Json(req): Json<CreateTaskRequest>,
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
    let task = state
        .task_service
        .create(
            &actor,
            NewTask {
                title: req.title,
                description: req.description,
                status: req.status,
                project_id: req.project_id,
                assigned_to_id: req.assigned_to_id,
            },
        )
        .await?;
    Ok(CreateResponse::Created(Json(task)))
}

/// `GET /api/tasks/{id}`
pub async fn get<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let task = state.task_service.get(&actor, parse_id(&id)?).await?;
    Ok(Json(task))
}

/// `PUT /api/tasks/{id}`
pub async fn update<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let task = state
        .task_service
        .update(
            &actor,
            parse_id(&id)?,
            TaskChanges {
                title: req.title,
                description: req.description,
                status: req.status,
                assigned_to_id: req.assigned_to_id,
            },
        )
        .await?;
    Ok(Json(task))
}

/// `PATCH /api/tasks/{id}/status`
pub async fn update_status<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Task>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let actor = current_user(&state, &headers).await?;
    let task = state
        .task_service
        .update_status(&actor, parse_id(&id)?, req.status)
        .await?;
    Ok(Json(task))
}

/// `DELETE /api/tasks/{id}`
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
    state.task_service.delete(&actor, parse_id(&id)?).await?;
    Ok(DeleteResponse::NoContent)
}
