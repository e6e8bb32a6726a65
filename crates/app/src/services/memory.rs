//! Shared in-memory fixtures for service tests: a single store
//! implementing every repository port, plus stub credential adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use taskhub_domain::error::{ConflictError, TaskHubError};
use taskhub_domain::id::{ProjectId, TaskId, TeamId, UserId};
use taskhub_domain::project::Project;
use taskhub_domain::role::Role;
use taskhub_domain::task::{Task, TaskStatus};
use taskhub_domain::team::Team;
use taskhub_domain::user::User;

use crate::ports::{
    Claims, CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};

#[derive(Default)]
pub struct MemStore {
    pub users: Mutex<HashMap<UserId, User>>,
    pub projects: Mutex<HashMap<ProjectId, Project>>,
    pub tasks: Mutex<HashMap<TaskId, Task>>,
    pub teams: Mutex<HashMap<TeamId, Team>>,
}

/// One handle over the shared store, implementing all repository ports so
/// cross-entity queries (joins) behave like the real database.
#[derive(Clone, Default)]
pub struct MemRepo(pub Arc<MemStore>);

impl MemRepo {
    pub fn seed_user(&self, role: Role) -> User {
        let id = UserId::new();
        let user = User {
            id,
            name: format!("{role} user"),
            email: format!("{id}@example.com"),
            password_hash: "hash:secret".to_string(),
            role,
            is_active: true,
        };
        self.0.users.lock().unwrap().insert(id, user.clone());
        user
    }

    pub fn seed_project(&self, admin_id: UserId, owner_id: Option<UserId>) -> Project {
        let project = Project {
            id: ProjectId::new(),
            name: "Fixture project".to_string(),
            description: None,
            status: taskhub_domain::project::ProjectStatus::Active,
            admin_id,
            owner_id,
        };
        self.0
            .projects
            .lock()
            .unwrap()
            .insert(project.id, project.clone());
        project
    }

    pub fn seed_task(&self, project_id: ProjectId, assigned_to_id: Option<UserId>) -> Task {
        let task = Task {
            id: TaskId::new(),
            title: "Fixture task".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            project_id,
            assigned_to_id,
        };
        self.0.tasks.lock().unwrap().insert(task.id, task.clone());
        task
    }

    pub fn seed_team(&self, project_id: ProjectId, owner_id: UserId, members: &[UserId]) -> Team {
        let team = Team::new("Fixture team", project_id, owner_id, members.iter().copied());
        self.0.teams.lock().unwrap().insert(team.id, team.clone());
        team
    }
}

impl UserRepository for MemRepo {
    async fn create(&self, user: User) -> Result<User, TaskHubError> {
        let mut users = self.0.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(ConflictError::DuplicateEmail.into());
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, TaskHubError> {
        Ok(self.0.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, TaskHubError> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_role(&self, role: Role) -> Result<Vec<User>, TaskHubError> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn get_all(&self) -> Result<Vec<User>, TaskHubError> {
        Ok(self.0.users.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, TaskHubError> {
        self.0.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<u64, TaskHubError> {
        Ok(self.0.users.lock().unwrap().len() as u64)
    }
}

impl ProjectRepository for MemRepo {
    async fn create(&self, project: Project) -> Result<Project, TaskHubError> {
        self.0
            .projects
            .lock()
            .unwrap()
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_by_id(&self, id: ProjectId) -> Result<Option<Project>, TaskHubError> {
        Ok(self.0.projects.lock().unwrap().get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Project>, TaskHubError> {
        Ok(self.0.projects.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_owner(&self, owner_id: UserId) -> Result<Vec<Project>, TaskHubError> {
        Ok(self
            .0
            .projects
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.owner_id == Some(owner_id))
            .cloned()
            .collect())
    }

    async fn find_by_member(&self, user_id: UserId) -> Result<Vec<Project>, TaskHubError> {
        let member_of: Vec<ProjectId> = self
            .0
            .teams
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.is_member(user_id))
            .map(|t| t.project_id)
            .collect();
        Ok(self
            .0
            .projects
            .lock()
            .unwrap()
            .values()
            .filter(|p| member_of.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn update(&self, project: Project) -> Result<Project, TaskHubError> {
        self.0
            .projects
            .lock()
            .unwrap()
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn deactivate(&self, project: Project) -> Result<Project, TaskHubError> {
        self.0
            .projects
            .lock()
            .unwrap()
            .insert(project.id, project.clone());
        for task in self.0.tasks.lock().unwrap().values_mut() {
            if task.project_id == project.id {
                task.status = TaskStatus::Incomplete;
            }
        }
        Ok(project)
    }

    async fn delete(&self, id: ProjectId) -> Result<(), TaskHubError> {
        self.0.tasks.lock().unwrap().retain(|_, t| t.project_id != id);
        self.0.teams.lock().unwrap().retain(|_, t| t.project_id != id);
        self.0.projects.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, TaskHubError> {
        Ok(self.0.projects.lock().unwrap().len() as u64)
    }
}

impl TaskRepository for MemRepo {
    async fn create(&self, task: Task) -> Result<Task, TaskHubError> {
        self.0.tasks.lock().unwrap().insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskHubError> {
        Ok(self.0.tasks.lock().unwrap().get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Task>, TaskHubError> {
        Ok(self.0.tasks.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> Result<Vec<Task>, TaskHubError> {
        Ok(self
            .0
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn find_by_project_owner(&self, owner_id: UserId) -> Result<Vec<Task>, TaskHubError> {
        let owned: Vec<ProjectId> = self
            .0
            .projects
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.owner_id == Some(owner_id))
            .map(|p| p.id)
            .collect();
        Ok(self
            .0
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|t| owned.contains(&t.project_id))
            .cloned()
            .collect())
    }

    async fn find_by_assignee(&self, user_id: UserId) -> Result<Vec<Task>, TaskHubError> {
        Ok(self
            .0
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.assigned_to_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn find_by_team_member(&self, user_id: UserId) -> Result<Vec<Task>, TaskHubError> {
        let member_of: Vec<ProjectId> = self
            .0
            .teams
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.is_member(user_id))
            .map(|t| t.project_id)
            .collect();
        Ok(self
            .0
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|t| member_of.contains(&t.project_id))
            .cloned()
            .collect())
    }

    async fn update(&self, task: Task) -> Result<Task, TaskHubError> {
        self.0.tasks.lock().unwrap().insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> Result<(), TaskHubError> {
        self.0.tasks.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, TaskHubError> {
        Ok(self.0.tasks.lock().unwrap().len() as u64)
    }
}

impl TeamRepository for MemRepo {
    async fn create(&self, team: Team) -> Result<Team, TaskHubError> {
        self.0.teams.lock().unwrap().insert(team.id, team.clone());
        Ok(team)
    }

    async fn get_by_id(&self, id: TeamId) -> Result<Option<Team>, TaskHubError> {
        Ok(self.0.teams.lock().unwrap().get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Team>, TaskHubError> {
        Ok(self.0.teams.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_owner(&self, owner_id: UserId) -> Result<Vec<Team>, TaskHubError> {
        Ok(self
            .0
            .teams
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_member(&self, user_id: UserId) -> Result<Vec<Team>, TaskHubError> {
        Ok(self
            .0
            .teams
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.is_member(user_id))
            .cloned()
            .collect())
    }

    async fn add_member(&self, team_id: TeamId, user_id: UserId) -> Result<(), TaskHubError> {
        if let Some(team) = self.0.teams.lock().unwrap().get_mut(&team_id) {
            team.member_ids.push(user_id);
        }
        Ok(())
    }

    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> Result<(), TaskHubError> {
        if let Some(team) = self.0.teams.lock().unwrap().get_mut(&team_id) {
            team.member_ids.retain(|id| *id != user_id);
        }
        Ok(())
    }

    async fn is_member_of_project(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<bool, TaskHubError> {
        Ok(self
            .0
            .teams
            .lock()
            .unwrap()
            .values()
            .any(|t| t.project_id == project_id && t.is_member(user_id)))
    }

    async fn count(&self) -> Result<u64, TaskHubError> {
        Ok(self.0.teams.lock().unwrap().len() as u64)
    }
}

/// Token codec whose tokens are `email;role` in the clear.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubCodec;

impl TokenCodec for StubCodec {
    fn issue(&self, claims: &Claims) -> Result<String, TaskHubError> {
        Ok(format!("{};{}", claims.email, claims.role))
    }

    fn verify(&self, token: &str) -> Result<Claims, TaskHubError> {
        let (email, role) = token
            .split_once(';')
            .ok_or(taskhub_domain::error::AuthError::InvalidToken)?;
        Ok(Claims {
            email: email.to_string(),
            role: role
                .parse()
                .map_err(|_| taskhub_domain::error::AuthError::InvalidToken)?,
        })
    }
}

/// Hasher producing `hash:<password>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubHasher;

impl CredentialHasher for StubHasher {
    fn hash(&self, password: &str) -> Result<String, TaskHubError> {
        Ok(format!("hash:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash == format!("hash:{password}")
    }
}
