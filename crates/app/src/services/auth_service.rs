//! Identity service — registration, login, and bearer-token resolution.

use taskhub_domain::error::{AuthError, ConflictError, NotFoundError, TaskHubError, ValidationError};
use taskhub_domain::role::Role;
use taskhub_domain::user::{User, normalize_email};

use crate::ports::{Claims, CredentialHasher, TokenCodec, UserRepository};

/// Registration payload, already shape-validated by the transport layer.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Application service for identity: issues credentials and resolves
/// bearer tokens to actors.
pub struct AuthService<R, T, H> {
    users: R,
    tokens: T,
    hasher: H,
}

impl<R, T, H> AuthService<R, T, H>
where
    R: UserRepository,
    T: TokenCodec,
    H: CredentialHasher,
{
    /// Create a new service backed by the given repository and credential
    /// implementations.
    pub fn new(users: R, tokens: T, hasher: H) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    /// Register a new user. The email is normalized (trim + lowercase)
    /// before the uniqueness check, so addresses differing only in case
    /// or surrounding whitespace collide.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Conflict`] for a duplicate email or a
    /// second admin, [`TaskHubError::Validation`] for malformed fields.
    #[tracing::instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<User, TaskHubError> {
        if registration.password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }
        let email = normalize_email(&registration.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ConflictError::DuplicateEmail.into());
        }
        if registration.role == Role::Admin
            && !self.users.find_by_role(Role::Admin).await?.is_empty()
        {
            return Err(ConflictError::DuplicateAdmin.into());
        }

        let password_hash = self.hasher.hash(&registration.password)?;
        let user = User::builder()
            .name(registration.name)
            .email(email)
            .password_hash(password_hash)
            .role(registration.role)
            .build()?;
        self.users.create(user).await
    }

    /// Verify credentials and issue a signed, time-limited token.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Unauthenticated`] when the email is unknown
    /// or the password does not match; the two cases are indistinguishable
    /// to the caller.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, TaskHubError> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };
        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }
        self.tokens.issue(&Claims {
            email: user.email,
            role: user.role,
        })
    }

    /// Resolve a bearer token to the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Unauthenticated`] for an expired or
    /// tampered token, [`TaskHubError::NotFound`] when the referenced
    /// identity no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<User, TaskHubError> {
        let claims = self.tokens.verify(token)?;
        self.users
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "User",
                    id: claims.email,
                }
                .into()
            })
    }
}
