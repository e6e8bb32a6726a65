//! Project lifecycle — create, list, update (with the inactive cascade),
//! and cascading delete.

use taskhub_domain::access::{self, Action, Resource};
use taskhub_domain::error::{NotFoundError, TaskHubError, ValidationError};
use taskhub_domain::event::DomainEvent;
use taskhub_domain::id::{ProjectId, UserId};
use taskhub_domain::project::{Project, ProjectStatus};
use taskhub_domain::role::Role;
use taskhub_domain::user::User;

use crate::ports::{EventPublisher, ProjectRepository, TeamRepository, UserRepository};

/// Payload for creating a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to the acting user when omitted.
    pub admin_id: Option<UserId>,
    pub owner_id: Option<UserId>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub owner_id: Option<UserId>,
}

/// Application service for the project lifecycle.
pub struct ProjectService<P, T, U, E> {
    projects: P,
    teams: T,
    users: U,
    events: E,
}

impl<P, T, U, E> ProjectService<P, T, U, E>
where
    P: ProjectRepository,
    T: TeamRepository,
    U: UserRepository,
    E: EventPublisher,
{
    /// Create a new service backed by the given repositories and publisher.
    pub fn new(projects: P, teams: T, users: U, events: E) -> Self {
        Self {
            projects,
            teams,
            users,
            events,
        }
    }

    /// Create a project. `owner_id`, when given, must reference an
    /// existing user with role owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Forbidden`] when the actor may not create
    /// the project, [`TaskHubError::Validation`] for an invalid owner
    /// reference or payload.
    #[tracing::instrument(skip(self, actor, payload), fields(actor = %actor.id, name = %payload.name))]
    pub async fn create(&self, actor: &User, payload: NewProject) -> Result<Project, TaskHubError> {
        access::check(
            actor.role,
            actor.id,
            Action::Create,
            &Resource::project(payload.owner_id),
        )?;
        if let Some(owner_id) = payload.owner_id {
            self.ensure_owner_role(owner_id).await?;
        }

        let mut builder = Project::builder()
            .name(payload.name)
            .admin_id(payload.admin_id.unwrap_or(actor.id));
        if let Some(description) = payload.description {
            builder = builder.description(description);
        }
        if let Some(owner_id) = payload.owner_id {
            builder = builder.owner_id(owner_id);
        }
        let project = self.projects.create(builder.build()?).await?;

        self.publish(DomainEvent::ProjectCreated {
            project_id: project.id,
            name: project.name.clone(),
            owner_id: project.owner_id,
            actor: actor.id,
        })
        .await;
        Ok(project)
    }

    /// Look up a project, enforcing role-scoped read access.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] for an unknown id,
    /// [`TaskHubError::Forbidden`] when the actor may not read it.
    pub async fn get(&self, actor: &User, id: ProjectId) -> Result<Project, TaskHubError> {
        let project = self.fetch(id).await?;
        let is_member = if actor.role == Role::Member {
            self.teams.is_member_of_project(id, actor.id).await?
        } else {
            false
        };
        access::check(
            actor.role,
            actor.id,
            Action::Read,
            &Resource::project(project.owner_id).with_team_membership(is_member),
        )?;
        Ok(project)
    }

    /// List projects visible to the actor: all for admins, owned for
    /// owners, team-membership for members.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, actor: &User) -> Result<Vec<Project>, TaskHubError> {
        match actor.role {
            Role::Admin => self.projects.get_all().await,
            Role::Owner => self.projects.find_by_owner(actor.id).await,
            Role::Member => self.projects.find_by_member(actor.id).await,
        }
    }

    /// Apply a partial update. Transitioning the status to inactive resets
    /// every task of the project to incomplete within the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`], [`TaskHubError::Forbidden`], or
    /// [`TaskHubError::Validation`] per the common operation contract.
    #[tracing::instrument(skip(self, actor, changes), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &User,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> Result<Project, TaskHubError> {
        let mut project = self.fetch(id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::Update,
            &Resource::project(project.owner_id),
        )?;

        if let Some(owner_id) = changes.owner_id {
            self.ensure_owner_role(owner_id).await?;
            project.owner_id = Some(owner_id);
        }
        if let Some(name) = changes.name {
            project.name = name;
        }
        if let Some(description) = changes.description {
            project.description = Some(description);
        }
        let deactivating = changes.status == Some(ProjectStatus::Inactive)
            && project.status != ProjectStatus::Inactive;
        if let Some(status) = changes.status {
            project.status = status;
        }
        project.validate()?;

        let project = if deactivating {
            self.projects.deactivate(project).await?
        } else {
            self.projects.update(project).await?
        };

        self.publish(DomainEvent::ProjectUpdated {
            project_id: project.id,
            status: project.status,
            owner_id: project.owner_id,
            actor: actor.id,
        })
        .await;
        Ok(project)
    }

    /// Delete a project, cascading to its tasks and teams in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] or [`TaskHubError::Forbidden`]
    /// per the common operation contract.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &User, id: ProjectId) -> Result<(), TaskHubError> {
        let project = self.fetch(id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::Delete,
            &Resource::project(project.owner_id),
        )?;
        self.projects.delete(id).await?;

        self.publish(DomainEvent::ProjectDeleted {
            project_id: id,
            actor: actor.id,
        })
        .await;
        Ok(())
    }

    /// Total number of projects, for the admin metrics endpoint.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count(&self) -> Result<u64, TaskHubError> {
        self.projects.count().await
    }

    async fn fetch(&self, id: ProjectId) -> Result<Project, TaskHubError> {
        self.projects.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Project",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn ensure_owner_role(&self, owner_id: UserId) -> Result<(), TaskHubError> {
        match self.users.get_by_id(owner_id).await? {
            Some(user) if user.role == Role::Owner => Ok(()),
            _ => Err(ValidationError::OwnerRoleRequired.into()),
        }
    }

    async fn publish(&self, event: DomainEvent) {
        if let Err(err) = self.events.publish(event).await {
            tracing::warn!(error = %err, "failed to publish project event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::ProjectHub;
    use crate::services::memory::MemRepo;
    use std::sync::Arc;
    use taskhub_domain::task::TaskStatus;

    fn service(
        repo: &MemRepo,
        hub: &Arc<ProjectHub>,
    ) -> ProjectService<MemRepo, MemRepo, MemRepo, Arc<ProjectHub>> {
        ProjectService::new(repo.clone(), repo.clone(), repo.clone(), Arc::clone(hub))
    }

    #[tokio::test]
    async fn should_create_project_with_owner_and_emit_event() {
        let repo = MemRepo::default();
        let hub = Arc::new(ProjectHub::new(16));
        let admin = repo.seed_user(Role::Admin);
        let owner = repo.seed_user(Role::Owner);
        let service = service(&repo, &hub);

        let project = service
            .create(
                &admin,
                NewProject {
                    name: "Relaunch".to_string(),
                    description: None,
                    admin_id: None,
                    owner_id: Some(owner.id),
                },
            )
            .await
            .unwrap();

        assert_eq!(project.admin_id, admin.id);
        assert_eq!(project.owner_id, Some(owner.id));
        assert_eq!(project.status, ProjectStatus::Active);
    }

    #[tokio::test]
    async fn should_reject_owner_reference_without_owner_role() {
        let repo = MemRepo::default();
        let hub = Arc::new(ProjectHub::new(16));
        let admin = repo.seed_user(Role::Admin);
        let member = repo.seed_user(Role::Member);
        let service = service(&repo, &hub);

        let result = service
            .create(
                &admin,
                NewProject {
                    name: "Relaunch".to_string(),
                    description: None,
                    admin_id: None,
                    owner_id: Some(member.id),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(TaskHubError::Validation(ValidationError::OwnerRoleRequired))
        ));
    }

    #[tokio::test]
    async fn should_reset_tasks_to_incomplete_when_deactivating() {
        let repo = MemRepo::default();
        let hub = Arc::new(ProjectHub::new(16));
        let admin = repo.seed_user(Role::Admin);
        let project = repo.seed_project(admin.id, None);
        let other = repo.seed_project(admin.id, None);
        let task = repo.seed_task(project.id, None);
        let untouched = repo.seed_task(other.id, None);
        let service = service(&repo, &hub);

        service
            .update(
                &admin,
                project.id,
                ProjectChanges {
                    status: Some(ProjectStatus::Inactive),
                    ..ProjectChanges::default()
                },
            )
            .await
            .unwrap();

        let tasks = repo.0.tasks.lock().unwrap();
        assert_eq!(tasks[&task.id].status, TaskStatus::Incomplete);
        assert_eq!(tasks[&untouched.id].status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn should_cascade_delete_only_own_tasks_and_teams() {
        let repo = MemRepo::default();
        let hub = Arc::new(ProjectHub::new(16));
        let admin = repo.seed_user(Role::Admin);
        let owner = repo.seed_user(Role::Owner);
        let doomed = repo.seed_project(admin.id, Some(owner.id));
        let kept = repo.seed_project(admin.id, Some(owner.id));
        repo.seed_task(doomed.id, None);
        let kept_task = repo.seed_task(kept.id, None);
        repo.seed_team(doomed.id, owner.id, &[owner.id]);
        let kept_team = repo.seed_team(kept.id, owner.id, &[owner.id]);
        let service = service(&repo, &hub);

        service.delete(&admin, doomed.id).await.unwrap();

        assert!(repo.0.projects.lock().unwrap().contains_key(&kept.id));
        assert!(!repo.0.projects.lock().unwrap().contains_key(&doomed.id));
        let tasks = repo.0.tasks.lock().unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks.contains_key(&kept_task.id));
        let teams = repo.0.teams.lock().unwrap();
        assert_eq!(teams.len(), 1);
        assert!(teams.contains_key(&kept_team.id));
    }

    #[tokio::test]
    async fn should_scope_listing_by_role() {
        let repo = MemRepo::default();
        let hub = Arc::new(ProjectHub::new(16));
        let admin = repo.seed_user(Role::Admin);
        let owner = repo.seed_user(Role::Owner);
        let member = repo.seed_user(Role::Member);
        let owned = repo.seed_project(admin.id, Some(owner.id));
        let pother = repo.seed_project(admin.id, None);
        repo.seed_team(pother.id, admin.id, &[member.id]);
        let service = service(&repo, &hub);

        assert_eq!(service.list(&admin).await.unwrap().len(), 2);

        let owner_view = service.list(&owner).await.unwrap();
        assert_eq!(owner_view.len(), 1);
        assert_eq!(owner_view[0].id, owned.id);

        let member_view = service.list(&member).await.unwrap();
        assert_eq!(member_view.len(), 1);
        assert_eq!(member_view[0].id, pother.id);
    }

    #[tokio::test]
    async fn should_forbid_owner_updating_foreign_project() {
        let repo = MemRepo::default();
        let hub = Arc::new(ProjectHub::new(16));
        let admin = repo.seed_user(Role::Admin);
        let owner = repo.seed_user(Role::Owner);
        let foreign = repo.seed_project(admin.id, None);
        let service = service(&repo, &hub);

        let result = service
            .update(&owner, foreign.id, ProjectChanges::default())
            .await;
        assert!(matches!(result, Err(TaskHubError::Forbidden(_))));
    }

    #[tokio::test]
    async fn should_broadcast_deletion_to_project_subscribers() {
        let repo = MemRepo::default();
        let hub = Arc::new(ProjectHub::new(16));
        let admin = repo.seed_user(Role::Admin);
        let project = repo.seed_project(admin.id, None);
        let mut rx = hub.subscribe(project.id);
        let service = service(&repo, &hub);

        service.delete(&admin, project.id).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, DomainEvent::ProjectDeleted { project_id, .. } if project_id == project.id));
    }
}
