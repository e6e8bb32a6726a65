//! Project — the top-level unit of collaboration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TaskHubError, ValidationError};
use crate::id::{ProjectId, UserId};

/// Lifecycle status of a project.
///
/// Transitioning to `Inactive` cascades: every task under the project is
/// reset to incomplete within the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Inactive,
    Completed,
}

impl ProjectStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "completed" => Ok(Self::Completed),
            _ => Err(ValidationError::UnknownStatus),
        }
    }
}

/// A project. `admin_id` is always set (the creating admin); `owner_id`,
/// when present, must reference a user whose role is owner — the lifecycle
/// manager enforces that cross-entity invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub admin_id: UserId,
    pub owner_id: Option<UserId>,
}

impl Project {
    /// Create a builder for constructing a [`Project`].
    #[must_use]
    pub fn builder() -> ProjectBuilder {
        ProjectBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), TaskHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Project`].
#[derive(Debug, Default)]
pub struct ProjectBuilder {
    id: Option<ProjectId>,
    name: Option<String>,
    description: Option<String>,
    status: Option<ProjectStatus>,
    admin_id: Option<UserId>,
    owner_id: Option<UserId>,
}

impl ProjectBuilder {
    #[must_use]
    pub fn id(mut self, id: ProjectId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn admin_id(mut self, admin_id: UserId) -> Self {
        self.admin_id = Some(admin_id);
        self
    }

    #[must_use]
    pub fn owner_id(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Build and validate the project. Status defaults to
    /// [`ProjectStatus::Active`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Validation`] when required fields are
    /// missing or invariants fail.
    pub fn build(self) -> Result<Project, TaskHubError> {
        let project = Project {
            id: self.id.unwrap_or_default(),
            name: self.name.ok_or(ValidationError::EmptyName)?,
            description: self.description,
            status: self.status.unwrap_or(ProjectStatus::Active),
            admin_id: self.admin_id.ok_or(ValidationError::InvalidId)?,
            owner_id: self.owner_id,
        };
        project.validate()?;
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_active_status() {
        let project = Project::builder()
            .name("Website relaunch")
            .admin_id(UserId::new())
            .build()
            .unwrap();
        assert_eq!(project.status, ProjectStatus::Active);
        assert!(project.owner_id.is_none());
    }

    #[test]
    fn should_reject_empty_name() {
        let result = Project::builder()
            .name("")
            .admin_id(UserId::new())
            .build();
        assert!(matches!(
            result,
            Err(TaskHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_require_admin_reference() {
        let result = Project::builder().name("Orphan").build();
        assert!(result.is_err());
    }

    #[test]
    fn should_roundtrip_status_through_str() {
        for status in [
            ProjectStatus::Active,
            ProjectStatus::Inactive,
            ProjectStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
    }
}
