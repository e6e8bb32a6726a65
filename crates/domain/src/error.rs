//! Error taxonomy shared across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`TaskHubError`]
//! via `#[from]`. The HTTP adapter maps every variant to a stable status code;
//! storage internals are never exposed to callers.

/// Top-level error type returned by application services.
#[derive(Debug, thiserror::Error)]
pub enum TaskHubError {
    /// Malformed or out-of-range payload.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// Missing, expired, or invalid credential.
    #[error("authentication error")]
    Unauthenticated(#[from] AuthError),

    /// Authenticated but not permitted.
    #[error("forbidden")]
    Forbidden(#[from] ForbiddenError),

    /// Resource id does not resolve.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Uniqueness or invariant violation.
    #[error("conflict")]
    Conflict(#[from] ConflictError),

    /// Failure in the persistence layer.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Payload validation failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("unknown role")]
    UnknownRole,

    #[error("unknown status")]
    UnknownStatus,

    #[error("invalid identifier")]
    InvalidId,

    #[error("owner_id must reference a user with role owner")]
    OwnerRoleRequired,

    #[error("admin must specify owner_id")]
    OwnerIdRequired,

    #[error("user already in team")]
    AlreadyInTeam,
}

/// Credential resolution failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Authorization denial with a machine-addressable reason.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ForbiddenError {
    /// Short stable reason string, safe to expose to clients.
    pub reason: &'static str,
}

/// A lookup that did not resolve.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Human-readable entity kind (`"User"`, `"Project"`, ...).
    pub entity: &'static str,
    /// The identifier that failed to resolve.
    pub id: String,
}

/// Uniqueness and invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("an admin account already exists")]
    DuplicateAdmin,

    #[error("cannot demote the only admin")]
    LastAdmin,
}
