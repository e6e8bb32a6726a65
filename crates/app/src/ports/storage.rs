//! Storage ports — repository traits for persistence.
//!
//! The entity store guarantees cascades happen inside one transaction, so
//! partial cascades are never observable; see [`ProjectRepository::delete`]
//! and [`ProjectRepository::deactivate`].

use std::future::Future;

use taskhub_domain::error::TaskHubError;
use taskhub_domain::id::{ProjectId, TaskId, TeamId, UserId};
use taskhub_domain::project::Project;
use taskhub_domain::role::Role;
use taskhub_domain::task::Task;
use taskhub_domain::team::Team;
use taskhub_domain::user::User;

/// Repository for [`User`] records. Email uniqueness is enforced by the
/// store (case-insensitive); a violation surfaces as
/// [`TaskHubError::Conflict`].
pub trait UserRepository {
    fn create(&self, user: User) -> impl Future<Output = Result<User, TaskHubError>> + Send;

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, TaskHubError>> + Send;

    /// Look up by normalized email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, TaskHubError>> + Send;

    fn find_by_role(
        &self,
        role: Role,
    ) -> impl Future<Output = Result<Vec<User>, TaskHubError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, TaskHubError>> + Send;

    fn update(&self, user: User) -> impl Future<Output = Result<User, TaskHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, TaskHubError>> + Send;
}

/// Repository for [`Project`] records.
pub trait ProjectRepository {
    fn create(
        &self,
        project: Project,
    ) -> impl Future<Output = Result<Project, TaskHubError>> + Send;

    fn get_by_id(
        &self,
        id: ProjectId,
    ) -> impl Future<Output = Result<Option<Project>, TaskHubError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<Project>, TaskHubError>> + Send;

    fn find_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Vec<Project>, TaskHubError>> + Send;

    /// Projects having a team that the given user belongs to.
    fn find_by_member(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Project>, TaskHubError>> + Send;

    fn update(
        &self,
        project: Project,
    ) -> impl Future<Output = Result<Project, TaskHubError>> + Send;

    /// Persist the updated project and reset all of its tasks to
    /// incomplete, within a single transaction.
    fn deactivate(
        &self,
        project: Project,
    ) -> impl Future<Output = Result<Project, TaskHubError>> + Send;

    /// Delete the project and cascade-delete its tasks and teams, in that
    /// order, within a single transaction.
    fn delete(&self, id: ProjectId) -> impl Future<Output = Result<(), TaskHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, TaskHubError>> + Send;
}

/// Repository for [`Task`] records.
pub trait TaskRepository {
    fn create(&self, task: Task) -> impl Future<Output = Result<Task, TaskHubError>> + Send;

    fn get_by_id(
        &self,
        id: TaskId,
    ) -> impl Future<Output = Result<Option<Task>, TaskHubError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<Task>, TaskHubError>> + Send;

    fn find_by_project(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<Task>, TaskHubError>> + Send;

    /// Tasks of projects owned by the given user.
    fn find_by_project_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Vec<Task>, TaskHubError>> + Send;

    fn find_by_assignee(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Task>, TaskHubError>> + Send;

    /// Tasks of projects that have a team containing the given user.
    fn find_by_team_member(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Task>, TaskHubError>> + Send;

    fn update(&self, task: Task) -> impl Future<Output = Result<Task, TaskHubError>> + Send;

    fn delete(&self, id: TaskId) -> impl Future<Output = Result<(), TaskHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, TaskHubError>> + Send;
}

/// Repository for [`Team`] records, including the membership join.
pub trait TeamRepository {
    /// Insert the team and its seed membership in one transaction.
    fn create(&self, team: Team) -> impl Future<Output = Result<Team, TaskHubError>> + Send;

    fn get_by_id(
        &self,
        id: TeamId,
    ) -> impl Future<Output = Result<Option<Team>, TaskHubError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<Team>, TaskHubError>> + Send;

    fn find_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Vec<Team>, TaskHubError>> + Send;

    fn find_by_member(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Team>, TaskHubError>> + Send;

    fn add_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), TaskHubError>> + Send;

    fn remove_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), TaskHubError>> + Send;

    /// Whether the user belongs to any team of the given project.
    fn is_member_of_project(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, TaskHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, TaskHubError>> + Send;
}
