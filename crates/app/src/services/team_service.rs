//! Team management: creation with seeded membership, member add/remove,
//! and role-scoped listing.

use taskhub_domain::access::{self, Action, Resource};
use taskhub_domain::error::{NotFoundError, TaskHubError, ValidationError};
use taskhub_domain::event::DomainEvent;
use taskhub_domain::id::{TeamId, UserId};
use taskhub_domain::project::Project;
use taskhub_domain::role::Role;
use taskhub_domain::team::Team;
use taskhub_domain::user::User;

use crate::ports::{EventPublisher, ProjectRepository, TeamRepository, UserRepository};

/// Payload for creating a team.
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub project_id: taskhub_domain::id::ProjectId,
    /// Required when an admin creates the team; owners always become the
    /// team owner themselves.
    pub owner_id: Option<UserId>,
    pub member_ids: Vec<UserId>,
}

/// Application service for teams.
pub struct TeamService<T, P, U, E> {
    teams: T,
    projects: P,
    users: U,
    events: E,
}

impl<T, P, U, E> TeamService<T, P, U, E>
where
    T: TeamRepository,
    P: ProjectRepository,
    U: UserRepository,
    E: EventPublisher,
{
    /// Create a new service backed by the given repositories and publisher.
    pub fn new(teams: T, projects: P, users: U, events: E) -> Self {
        Self {
            teams,
            projects,
            users,
            events,
        }
    }

    /// Create a team under a project. The seed membership is the requested
    /// members plus the project owner and the team owner, deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] for an unknown project,
    /// [`TaskHubError::Forbidden`] when the actor may not manage teams in
    /// it, [`TaskHubError::Validation`] when an admin omits `owner_id` or
    /// the payload is invalid.
    #[tracing::instrument(skip(self, actor, payload), fields(actor = %actor.id, name = %payload.name))]
    pub async fn create(&self, actor: &User, payload: NewTeam) -> Result<Team, TaskHubError> {
        let project = self.fetch_project(payload.project_id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::Create,
            &Resource::team(project.owner_id),
        )?;

        let owner_id = match actor.role {
            Role::Admin => payload.owner_id.ok_or(ValidationError::OwnerIdRequired)?,
            _ => actor.id,
        };
        let seed = payload
            .member_ids
            .iter()
            .copied()
            .chain(project.owner_id)
            .chain([owner_id]);
        let team = Team::new(payload.name, project.id, owner_id, seed);
        team.validate()?;
        let team = self.teams.create(team).await?;

        self.publish(DomainEvent::TeamCreated {
            project_id: team.project_id,
            team_id: team.id,
            name: team.name.clone(),
            owner_id: team.owner_id,
            member_ids: team.member_ids.clone(),
        })
        .await;
        Ok(team)
    }

    /// Look up a team, enforcing role-scoped read access.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] for an unknown id,
    /// [`TaskHubError::Forbidden`] when the actor may not read it.
    pub async fn get(&self, actor: &User, id: TeamId) -> Result<Team, TaskHubError> {
        let team = self.fetch(id).await?;
        let project = self.fetch_project(team.project_id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::Read,
            &Resource::team(project.owner_id).with_team_membership(team.is_member(actor.id)),
        )?;
        Ok(team)
    }

    /// List teams visible to the actor: all for admins, owned for owners,
    /// membership for members.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, actor: &User) -> Result<Vec<Team>, TaskHubError> {
        match actor.role {
            Role::Admin => self.teams.get_all().await,
            Role::Owner => self.teams.find_by_owner(actor.id).await,
            Role::Member => self.teams.find_by_member(actor.id).await,
        }
    }

    /// Add a user to a team. Adding a user who is already a member fails
    /// and leaves the membership unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] for an unknown team or user,
    /// [`TaskHubError::Forbidden`] when the actor may not manage the team,
    /// [`TaskHubError::Validation`] when the user is already a member.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn add_member(
        &self,
        actor: &User,
        id: TeamId,
        user_id: UserId,
    ) -> Result<Team, TaskHubError> {
        let team = self.fetch(id).await?;
        let project = self.fetch_project(team.project_id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::Update,
            &Resource::team(project.owner_id),
        )?;
        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(NotFoundError {
                entity: "User",
                id: user_id.to_string(),
            }
            .into());
        }
        if team.is_member(user_id) {
            return Err(ValidationError::AlreadyInTeam.into());
        }
        self.teams.add_member(id, user_id).await?;

        self.publish(DomainEvent::TeamMemberAdded {
            project_id: team.project_id,
            team_id: id,
            user_id,
        })
        .await;
        self.fetch(id).await
    }

    /// Remove a user from a team.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::NotFound`] for an unknown team or a user
    /// who is not a member, [`TaskHubError::Forbidden`] when the actor may
    /// not manage the team.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn remove_member(
        &self,
        actor: &User,
        id: TeamId,
        user_id: UserId,
    ) -> Result<Team, TaskHubError> {
        let team = self.fetch(id).await?;
        let project = self.fetch_project(team.project_id).await?;
        access::check(
            actor.role,
            actor.id,
            Action::Update,
            &Resource::team(project.owner_id),
        )?;
        if !team.is_member(user_id) {
            return Err(NotFoundError {
                entity: "team member",
                id: user_id.to_string(),
            }
            .into());
        }
        self.teams.remove_member(id, user_id).await?;

        self.publish(DomainEvent::TeamMemberRemoved {
            project_id: team.project_id,
            team_id: id,
            user_id,
        })
        .await;
        self.fetch(id).await
    }

    /// Total number of teams, for the admin metrics endpoint.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count(&self) -> Result<u64, TaskHubError> {
        self.teams.count().await
    }

    async fn fetch(&self, id: TeamId) -> Result<Team, TaskHubError> {
        self.teams.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Team",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn fetch_project(
        &self,
        id: taskhub_domain::id::ProjectId,
    ) -> Result<Project, TaskHubError> {
        self.projects.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Project",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn publish(&self, event: DomainEvent) {
        if let Err(err) = self.events.publish(event).await {
            tracing::warn!(error = %err, "failed to publish team event");
        }
    }
}
