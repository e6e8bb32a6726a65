//! Registration and login handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use taskhub_app::ports::{
    CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};
use taskhub_app::services::auth_service::Registration;
use taskhub_domain::role::Role;
use taskhub_domain::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registration.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to member when omitted.
    pub role: Option<Role>,
}

/// Request body for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created(Json<User>),
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `POST /api/auth/register`
pub async fn register<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    Json(req): Json<RegisterRequest>,
) -> Result<RegisterResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let user = state
        .auth_service
        .register(Registration {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role.unwrap_or(Role::Member),
        })
        .await?;
    Ok(RegisterResponse::Created(Json(user)))
}

/// `POST /api/auth/login`
pub async fn login<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let access_token = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
