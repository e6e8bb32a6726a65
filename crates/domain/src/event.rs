//! Domain events — immutable records of state changes.
//!
//! Events are ephemeral: they are emitted by the lifecycle services after
//! a mutation commits, fanned out to live subscribers of the affected
//! project, and never persisted. Payloads carry the minimal fields a
//! client needs to reconcile its state.

use serde::{Deserialize, Serialize};

use crate::id::{ProjectId, TaskId, TeamId, UserId};
use crate::project::ProjectStatus;
use crate::task::TaskStatus;

/// A state-change notification scoped to one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    ProjectCreated {
        project_id: ProjectId,
        name: String,
        owner_id: Option<UserId>,
        actor: UserId,
    },
    ProjectUpdated {
        project_id: ProjectId,
        status: ProjectStatus,
        owner_id: Option<UserId>,
        actor: UserId,
    },
    ProjectDeleted {
        project_id: ProjectId,
        actor: UserId,
    },
    TaskCreated {
        project_id: ProjectId,
        task_id: TaskId,
        title: String,
        assigned_to: Option<UserId>,
        status: TaskStatus,
    },
    TaskUpdated {
        project_id: ProjectId,
        task_id: TaskId,
        title: String,
        assigned_to: Option<UserId>,
        status: TaskStatus,
    },
    TaskDeleted {
        project_id: ProjectId,
        task_id: TaskId,
    },
    TaskStatusUpdated {
        project_id: ProjectId,
        task_id: TaskId,
        status: TaskStatus,
        updated_by: String,
    },
    TeamCreated {
        project_id: ProjectId,
        team_id: TeamId,
        name: String,
        owner_id: UserId,
        member_ids: Vec<UserId>,
    },
    TeamMemberAdded {
        project_id: ProjectId,
        team_id: TeamId,
        user_id: UserId,
    },
    TeamMemberRemoved {
        project_id: ProjectId,
        team_id: TeamId,
        user_id: UserId,
    },
}

impl DomainEvent {
    /// The project whose subscribers should receive this event.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::ProjectCreated { project_id, .. }
            | Self::ProjectUpdated { project_id, .. }
            | Self::ProjectDeleted { project_id, .. }
            | Self::TaskCreated { project_id, .. }
            | Self::TaskUpdated { project_id, .. }
            | Self::TaskDeleted { project_id, .. }
            | Self::TaskStatusUpdated { project_id, .. }
            | Self::TeamCreated { project_id, .. }
            | Self::TeamMemberAdded { project_id, .. }
            | Self::TeamMemberRemoved { project_id, .. } => *project_id,
        }
    }
}
