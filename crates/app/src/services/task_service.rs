//! Task lifecycle: CRUD plus the assignee-driven status update, with
//! broadcast events and email notifications fanned out per change.

use taskhub_domain::access::{self, Action, Resource};
use taskhub_domain::error::{NotFoundError, TaskHubError};
use taskhub_domain::event::DomainEvent;
use taskhub_domain::id::{ProjectId, TaskId, UserId};
use taskhub_domain::project::Project;
use taskhub_domain::role::Role;
use taskhub_domain::task::{Task, TaskStatus};
use taskhub_domain::user::User;

use crate::notify::Outbox;
use crate::ports::{
    Email, EventPublisher, ProjectRepository, TaskRepository, TeamRepository, UserRepository,
};

/// Payload for creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to [`TaskStatus::InProgress`] when omitted.
    pub status: Option<TaskStatus>,
    pub project_id: ProjectId,
    pub assigned_to_id: Option<UserId>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to_id: Option<UserId>,
}

/// Application service for tasks.
pub struct TaskService<T, P, M, U, E> {
    tasks: T,
    projects: P,
    teams: M,
    users: U,
    events: E,
    outbox: Outbox,
}

impl<T, P, M, U, E> TaskService<T, P, M, U, E>
where
    T: TaskRepository,
    P: ProjectRepository,
    M: TeamRepository,
    U: UserRepository,
    E: EventPublisher,
{
    /// Create a new service backed by the given repositories, publisher
    /// and notification queue.
    pub fn new(tasks: T, projects: P, teams: M, users: U, events: E, outbox: Outbox) -> Self {
        Self {
            tasks,
            projects,
            teams,
            users,
            events,
            outbox,
        }
    }

    /// Create a task under a project. Emails go out to the assignee, the
    /// project owner and every admin.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] for an unknown project,
    /// [`TaskHubError::Forbidden`] when the actor may not manage tasks in
    /// it, [`TaskHubError::Validation`] for an invalid payload.
    #[tracing::instrument(skip(self, actor, payload), fields(actor = %actor.id, title = %payload.title))]
    pub async fn create(&self, actor: &User, payload: NewTask) -> Result<Task, TaskHubError> {
        let project = self.fetch_project(payload.project_id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::Create,
            &Resource::task(project.owner_id, payload.assigned_to_id),
        )?;

        let mut builder = Task::builder()
            .title(payload.title)
            .project_id(project.id);
        if let Some(description) = payload.description {
            builder = builder.description(description);
        }
        if let Some(status) = payload.status {
            builder = builder.status(status);
        }
        if let Some(assigned_to_id) = payload.assigned_to_id {
            builder = builder.assigned_to_id(assigned_to_id);
        }
        let task = self.tasks.create(builder.build()?).await?;

        self.publish(DomainEvent::TaskCreated {
            project_id: task.project_id,
            task_id: task.id,
            title: task.title.clone(),
            assigned_to: task.assigned_to_id,
            status: task.status,
        })
        .await;
        self.mail_recipients(&project, &task, |recipient| {
            Email::task_assigned(recipient, &project.name, &task.title, &actor.name)
        })
        .await;
        Ok(task)
    }

    /// Look up a task, enforcing role-scoped read access.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] for an unknown id,
    /// [`TaskHubError::Forbidden`] when the actor may not read it.
    pub async fn get(&self, actor: &User, id: TaskId) -> Result<Task, TaskHubError> {
        let task = self.fetch(id).await?;
        let project = self.fetch_project(task.project_id).await?;
        let resource = self.read_resource(actor, &project, &task).await?;
        access::check(actor.role, actor.id, Action::Read, &resource)?;
        Ok(task)
    }

    /// List tasks visible to the actor: all for admins, tasks of owned
    /// projects for owners, team-project tasks plus direct assignments for
    /// members.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, actor: &User) -> Result<Vec<Task>, TaskHubError> {
        match actor.role {
            Role::Admin => self.tasks.get_all().await,
            Role::Owner => self.tasks.find_by_project_owner(actor.id).await,
            Role::Member => {
                let mut tasks = self.tasks.find_by_team_member(actor.id).await?;
                for task in self.tasks.find_by_assignee(actor.id).await? {
                    if !tasks.iter().any(|t| t.id == task.id) {
                        tasks.push(task);
                    }
                }
                Ok(tasks)
            }
        }
    }

    /// List every task of one project, enforcing read access to the
    /// project itself.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] for an unknown project,
    /// [`TaskHubError::Forbidden`] when the actor may not read it.
    pub async fn list_by_project(
        &self,
        actor: &User,
        project_id: ProjectId,
    ) -> Result<Vec<Task>, TaskHubError> {
        let project = self.fetch_project(project_id).await?;
        let is_member = if actor.role == Role::Member {
            self.teams
                .is_member_of_project(project.id, actor.id)
                .await?
        } else {
            false
        };
        access::check(
            actor.role,
            actor.id,
            Action::Read,
            &Resource::project(project.owner_id).with_team_membership(is_member),
        )?;
        self.tasks.find_by_project(project_id).await
    }

    /// Apply a partial update and notify the usual recipients.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`], [`TaskHubError::Forbidden`], or
    /// [`TaskHubError::Validation`] per the common operation contract.
    #[tracing::instrument(skip(self, actor, changes), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &User,
        id: TaskId,
        changes: TaskChanges,
    ) -> Result<Task, TaskHubError> {
        let mut task = self.fetch(id).await?;
        let project = self.fetch_project(task.project_id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::Update,
            &Resource::task(project.owner_id, task.assigned_to_id),
        )?;

        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = Some(description);
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        if let Some(assigned_to_id) = changes.assigned_to_id {
            task.assigned_to_id = Some(assigned_to_id);
        }
        task.validate()?;
        let task = self.tasks.update(task).await?;

        self.publish(DomainEvent::TaskUpdated {
            project_id: task.project_id,
            task_id: task.id,
            title: task.title.clone(),
            assigned_to: task.assigned_to_id,
            status: task.status,
        })
        .await;
        self.mail_recipients(&project, &task, |recipient| {
            Email::task_status_updated(
                recipient,
                &project.name,
                &task.title,
                task.status.as_str(),
                &actor.name,
            )
        })
        .await;
        Ok(task)
    }

    /// Change only the status. Assignees may do this on their own tasks;
    /// managers on any task they manage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] or [`TaskHubError::Forbidden`]
    /// per the common operation contract.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id, status = %status))]
    pub async fn update_status(
        &self,
        actor: &User,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, TaskHubError> {
        let mut task = self.fetch(id).await?;
        let project = self.fetch_project(task.project_id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::UpdateStatus,
            &Resource::task(project.owner_id, task.assigned_to_id),
        )?;

        task.status = status;
        let task = self.tasks.update(task).await?;

        self.publish(DomainEvent::TaskStatusUpdated {
            project_id: task.project_id,
            task_id: task.id,
            status: task.status,
            updated_by: actor.name.clone(),
        })
        .await;
        self.mail_recipients(&project, &task, |recipient| {
            Email::task_status_updated(
                recipient,
                &project.name,
                &task.title,
                task.status.as_str(),
                &actor.name,
            )
        })
        .await;
        Ok(task)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] or [`TaskHubError::Forbidden`]
    /// per the common operation contract.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &User, id: TaskId) -> Result<(), TaskHubError> {
        let task = self.fetch(id).await?;
        let project = self.fetch_project(task.project_id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::Delete,
            &Resource::task(project.owner_id, task.assigned_to_id),
        )?;
        self.tasks.delete(id).await?;

        self.publish(DomainEvent::TaskDeleted {
            project_id: task.project_id,
            task_id: task.id,
        })
        .await;
        Ok(())
    }

    /// Total number of tasks, for the admin metrics endpoint.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count(&self) -> Result<u64, TaskHubError> {
        self.tasks.count().await
    }

    async fn fetch(&self, id: TaskId) -> Result<Task, TaskHubError> {
        self.tasks.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Task",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn fetch_project(&self, id: ProjectId) -> Result<Project, TaskHubError> {
        self.projects.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Project",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn read_resource(
        &self,
        actor: &User,
        project: &Project,
        task: &Task,
    ) -> Result<Resource, TaskHubError> {
        let is_member = if actor.role == Role::Member {
            self.teams
                .is_member_of_project(project.id, actor.id)
                .await?
        } else {
            false
        };
        Ok(Resource::task(project.owner_id, task.assigned_to_id)
            .with_team_membership(is_member))
    }

    /// Resolve notification recipients: the assignee, the project owner
    /// and every admin, deduplicated by email.
    async fn recipients(&self, project: &Project, task: &Task) -> Result<Vec<String>, TaskHubError> {
        let mut recipients = Vec::new();
        let mut push = |email: String| {
            if !recipients.contains(&email) {
                recipients.push(email);
            }
        };
        if let Some(assigned_to_id) = task.assigned_to_id
            && let Some(user) = self.users.get_by_id(assigned_to_id).await?
        {
            push(user.email);
        }
        if let Some(owner_id) = project.owner_id
            && let Some(user) = self.users.get_by_id(owner_id).await?
        {
            push(user.email);
        }
        for admin in self.users.find_by_role(Role::Admin).await? {
            push(admin.email);
        }
        Ok(recipients)
    }

    /// Queue one email per recipient. Lookup failures are logged and
    /// skipped; the triggering request never fails over a notification.
    async fn mail_recipients(
        &self,
        project: &Project,
        task: &Task,
        compose: impl Fn(String) -> Email,
    ) {
        match self.recipients(project, task).await {
            Ok(recipients) => {
                for recipient in recipients {
                    self.outbox.push(compose(recipient));
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, task = %task.id, "failed to resolve email recipients");
            }
        }
    }

    async fn publish(&self, event: DomainEvent) {
        if let Err(err) = self.events.publish(event).await {
            tracing::warn!(error = %err, "failed to publish task event");
        }
    }
}
