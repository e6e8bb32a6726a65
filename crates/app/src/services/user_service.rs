//! User administration — role and active-flag changes, listing.

use taskhub_domain::access::{self, Action, Resource};
use taskhub_domain::error::{ConflictError, NotFoundError, TaskHubError};
use taskhub_domain::id::UserId;
use taskhub_domain::role::Role;
use taskhub_domain::user::User;

use crate::ports::UserRepository;

/// Application service for administering user accounts.
pub struct UserService<R> {
    users: R,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(users: R) -> Self {
        Self { users }
    }

    /// List all users. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Forbidden`] for non-admin actors.
    pub async fn list(&self, actor: &User) -> Result<Vec<User>, TaskHubError> {
        access::check(actor.role, actor.id, Action::Read, &Resource::user())?;
        self.users.get_all().await
    }

    /// Change a user's role, preserving the invariant that exactly one
    /// admin exists at all times.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Conflict`] when the change would create a
    /// second admin or demote the only one, [`TaskHubError::NotFound`]
    /// for an unknown user, [`TaskHubError::Forbidden`] for non-admins.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn change_role(
        &self,
        actor: &User,
        user_id: UserId,
        new_role: Role,
    ) -> Result<User, TaskHubError> {
        access::check(actor.role, actor.id, Action::Update, &Resource::user())?;
        let mut user = self.get(user_id).await?;
        if user.role == new_role {
            return Ok(user);
        }
        if new_role == Role::Admin && !self.users.find_by_role(Role::Admin).await?.is_empty() {
            return Err(ConflictError::DuplicateAdmin.into());
        }
        if user.role == Role::Admin {
            return Err(ConflictError::LastAdmin.into());
        }
        user.role = new_role;
        self.users.update(user).await
    }

    /// Enable or disable an account. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] for an unknown user,
    /// [`TaskHubError::Forbidden`] for non-admins.
    pub async fn set_active(
        &self,
        actor: &User,
        user_id: UserId,
        is_active: bool,
    ) -> Result<User, TaskHubError> {
        access::check(actor.role, actor.id, Action::Update, &Resource::user())?;
        let mut user = self.get(user_id).await?;
        user.is_active = is_active;
        self.users.update(user).await
    }

    /// Total number of users, for the admin metrics endpoint.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count(&self) -> Result<u64, TaskHubError> {
        self.users.count().await
    }

    async fn get(&self, id: UserId) -> Result<User, TaskHubError> {
        self.users.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into()
        })
    }
}
