//! Bearer-token resolution for protected endpoints.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use taskhub_app::ports::{
    CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};
use taskhub_domain::error::{AuthError, TaskHubError};
use taskhub_domain::user::User;

use crate::state::AppState;

/// Extract the bearer token from an `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)
}

/// Resolve the request's bearer token to an authenticated actor.
///
/// # Errors
///
/// Returns [`TaskHubError::Unauthenticated`] when the header is missing,
/// malformed, or the token does not verify.
pub async fn current_user<UR, PR, TR, MR, TK, HS>(
    state: &AppState<UR, PR, TR, MR, TK, HS>,
    headers: &HeaderMap,
) -> Result<User, TaskHubError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let token = bearer_token(headers)?;
    state.auth_service.authenticate(token).await
}
