//! User — an authenticated identity with a role.

use serde::{Deserialize, Serialize};

use crate::error::{TaskHubError, ValidationError};
use crate::id::UserId;
use crate::role::Role;

/// A registered user. The credential hash is opaque to the domain; hashing
/// and verification live behind the `CredentialHasher` port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Normalized (trimmed, lowercased) email address, unique system-wide.
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

/// Normalize an email for lookup and uniqueness: trim then lowercase.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Validation`] when the name is empty or the
    /// email is malformed.
    pub fn validate(&self) -> Result<(), TaskHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    name: Option<String>,
    email: Option<String>,
    password_hash: Option<String>,
    role: Option<Role>,
    is_active: Option<bool>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email address; it is normalized on `build`.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Build and validate the user. Role defaults to [`Role::Member`],
    /// the active flag to `true`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Validation`] when required fields are
    /// missing or invariants fail.
    pub fn build(self) -> Result<User, TaskHubError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            name: self.name.ok_or(ValidationError::EmptyName)?,
            email: normalize_email(&self.email.ok_or(ValidationError::InvalidEmail)?),
            password_hash: self.password_hash.ok_or(ValidationError::EmptyPassword)?,
            role: self.role.unwrap_or(Role::Member),
            is_active: self.is_active.unwrap_or(true),
        };
        user.validate()?;
        Ok(user)
    }
}
