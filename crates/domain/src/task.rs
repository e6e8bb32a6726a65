//! Task — a unit of work inside a project.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TaskHubError, ValidationError};
use crate::id::{ProjectId, TaskId, UserId};

/// Progress status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Incomplete,
    Completed,
}

impl TaskStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "incomplete" => Ok(Self::Incomplete),
            "completed" => Ok(Self::Completed),
            _ => Err(ValidationError::UnknownStatus),
        }
    }
}

/// A task always belongs to exactly one project. The assignee may be any
/// user id; membership of the project's teams is not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub project_id: ProjectId,
    pub assigned_to_id: Option<UserId>,
}

impl Task {
    /// Create a builder for constructing a [`Task`].
    #[must_use]
    pub fn builder() -> TaskBuilder {
        TaskBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Validation`] when `title` is empty.
    pub fn validate(&self) -> Result<(), TaskHubError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Task`].
#[derive(Debug, Default)]
pub struct TaskBuilder {
    id: Option<TaskId>,
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    project_id: Option<ProjectId>,
    assigned_to_id: Option<UserId>,
}

impl TaskBuilder {
    #[must_use]
    pub fn id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn project_id(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    #[must_use]
    pub fn assigned_to_id(mut self, assigned_to_id: UserId) -> Self {
        self.assigned_to_id = Some(assigned_to_id);
        self
    }

    /// Build and validate the task. Status defaults to
    /// [`TaskStatus::InProgress`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Validation`] when required fields are
    /// missing or invariants fail.
    pub fn build(self) -> Result<Task, TaskHubError> {
        let task = Task {
            id: self.id.unwrap_or_default(),
            title: self.title.ok_or(ValidationError::EmptyTitle)?,
            description: self.description,
            status: self.status.unwrap_or(TaskStatus::InProgress),
            project_id: self.project_id.ok_or(ValidationError::InvalidId)?,
            assigned_to_id: self.assigned_to_id,
        };
        task.validate()?;
        Ok(task)
    }
}
