//! `SQLite` implementation of [`ProjectRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use taskhub_app::ports::ProjectRepository;
use taskhub_domain::error::TaskHubError;
use taskhub_domain::id::{ProjectId, UserId};
use taskhub_domain::project::{Project, ProjectStatus};
use taskhub_domain::task::TaskStatus;

use crate::error::StorageError;

struct Wrapper(Project);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Project> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let status: String = row.try_get("status")?;
        let admin_id: String = row.try_get("admin_id")?;
        let owner_id: Option<String> = row.try_get("owner_id")?;

        let id = ProjectId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let status =
            ProjectStatus::from_str(&status).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let admin_id =
            UserId::from_str(&admin_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let owner_id = owner_id
            .map(|raw| UserId::from_str(&raw))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Project {
            id,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            status,
            admin_id,
            owner_id,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO projects (id, name, description, status, admin_id, owner_id)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM projects WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM projects";
const SELECT_BY_OWNER: &str = "SELECT * FROM projects WHERE owner_id = ?";

const SELECT_BY_MEMBER: &str = r"
    SELECT DISTINCT p.*
    FROM projects p
    JOIN teams t ON t.project_id = p.id
    JOIN team_members m ON m.team_id = t.id
    WHERE m.user_id = ?
";

const UPDATE: &str = r"
    UPDATE projects
    SET name = ?, description = ?, status = ?, owner_id = ?
    WHERE id = ?
";

const RESET_TASKS: &str = "UPDATE tasks SET status = ? WHERE project_id = ?";

const DELETE_TASKS: &str = "DELETE FROM tasks WHERE project_id = ?";
const DELETE_TEAM_MEMBERS: &str = r"
    DELETE FROM team_members
    WHERE team_id IN (SELECT id FROM teams WHERE project_id = ?)
";
const DELETE_TEAMS: &str = "DELETE FROM teams WHERE project_id = ?";
const DELETE_BY_ID: &str = "DELETE FROM projects WHERE id = ?";

const COUNT: &str = "SELECT COUNT(*) FROM projects";

/// `SQLite`-backed project repository.
#[derive(Clone)]
pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ProjectRepository for SqliteProjectRepository {
    async fn create(&self, project: Project) -> Result<Project, TaskHubError> {
        sqlx::query(INSERT)
            .bind(project.id.to_string())
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.status.as_str())
            .bind(project.admin_id.to_string())
            .bind(project.owner_id.map(|id| id.to_string()))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(project)
    }

    async fn get_by_id(&self, id: ProjectId) -> Result<Option<Project>, TaskHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Project>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_owner(&self, owner_id: UserId) -> Result<Vec<Project>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_OWNER)
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_member(&self, user_id: UserId) -> Result<Vec<Project>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_MEMBER)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, project: Project) -> Result<Project, TaskHubError> {
        sqlx::query(UPDATE)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.status.as_str())
            .bind(project.owner_id.map(|id| id.to_string()))
            .bind(project.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(project)
    }

    async fn deactivate(&self, project: Project) -> Result<Project, TaskHubError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        sqlx::query(UPDATE)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.status.as_str())
            .bind(project.owner_id.map(|id| id.to_string()))
            .bind(project.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        sqlx::query(RESET_TASKS)
            .bind(TaskStatus::Incomplete.as_str())
            .bind(project.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(project)
    }

    async fn delete(&self, id: ProjectId) -> Result<(), TaskHubError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        for statement in [DELETE_TASKS, DELETE_TEAM_MEMBERS, DELETE_TEAMS, DELETE_BY_ID] {
            sqlx::query(statement)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, TaskHubError> {
        let count: i64 = sqlx::query_scalar(COUNT)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(count.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use taskhub_domain::role::Role;
    use taskhub_domain::user::User;

    async fn setup() -> (SqliteProjectRepository, SqlitePool, UserId) {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let pool = db.pool().clone();

        let admin = User::builder()
            .name("Root")
            .email("root@example.com")
            .password_hash("hash")
            .role(Role::Admin)
            .build()
            .unwrap();
        sqlx::query("INSERT INTO users (id, name, email, password_hash, role, is_active) VALUES (?, ?, ?, ?, ?, 1)")
            .bind(admin.id.to_string())
            .bind(&admin.name)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(admin.role.as_str())
            .execute(&pool)
            .await
            .unwrap();

        (SqliteProjectRepository::new(pool.clone()), pool, admin.id)
    }

    fn test_project(admin_id: UserId) -> Project {
        Project::builder()
            .name("Website relaunch")
            .admin_id(admin_id)
            .build()
            .unwrap()
    }

    async fn insert_task(pool: &SqlitePool, project_id: ProjectId, status: TaskStatus) -> String {
        let id = taskhub_domain::id::TaskId::new().to_string();
        sqlx::query("INSERT INTO tasks (id, title, description, status, project_id, assigned_to_id) VALUES (?, 'T', NULL, ?, ?, NULL)")
            .bind(&id)
            .bind(status.as_str())
            .bind(project_id.to_string())
            .execute(pool)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn should_create_and_retrieve_project() {
        let (repo, _pool, admin_id) = setup().await;
        let project = test_project(admin_id);
        let id = project.id;

        repo.create(project).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Website relaunch");
        assert_eq!(fetched.status, ProjectStatus::Active);
        assert_eq!(fetched.admin_id, admin_id);
        assert!(fetched.owner_id.is_none());
    }

    #[tokio::test]
    async fn should_reset_tasks_when_deactivating() {
        let (repo, pool, admin_id) = setup().await;
        let mut project = test_project(admin_id);
        repo.create(project.clone()).await.unwrap();
        let other = test_project(admin_id);
        repo.create(other.clone()).await.unwrap();
        insert_task(&pool, project.id, TaskStatus::Completed).await;
        insert_task(&pool, other.id, TaskStatus::Completed).await;

        project.status = ProjectStatus::Inactive;
        repo.deactivate(project.clone()).await.unwrap();

        let statuses: Vec<(String, String)> =
            sqlx::query_as("SELECT project_id, status FROM tasks")
                .fetch_all(&pool)
                .await
                .unwrap();
        for (project_id, status) in statuses {
            if project_id == project.id.to_string() {
                assert_eq!(status, "incomplete");
            } else {
                assert_eq!(status, "completed");
            }
        }
    }

    #[tokio::test]
    async fn should_cascade_delete_tasks_and_teams() {
        let (repo, pool, admin_id) = setup().await;
        let doomed = test_project(admin_id);
        repo.create(doomed.clone()).await.unwrap();
        let kept = test_project(admin_id);
        repo.create(kept.clone()).await.unwrap();
        insert_task(&pool, doomed.id, TaskStatus::InProgress).await;
        let kept_task = insert_task(&pool, kept.id, TaskStatus::InProgress).await;
        let team_id = taskhub_domain::id::TeamId::new().to_string();
        sqlx::query("INSERT INTO teams (id, name, project_id, owner_id) VALUES (?, 'Backend', ?, ?)")
            .bind(&team_id)
            .bind(doomed.id.to_string())
            .bind(admin_id.to_string())
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO team_members (team_id, user_id) VALUES (?, ?)")
            .bind(&team_id)
            .bind(admin_id.to_string())
            .execute(&pool)
            .await
            .unwrap();

        repo.delete(doomed.id).await.unwrap();

        assert!(repo.get_by_id(doomed.id).await.unwrap().is_none());
        assert!(repo.get_by_id(kept.id).await.unwrap().is_some());
        let task_ids: Vec<(String,)> = sqlx::query_as("SELECT id FROM tasks")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(task_ids, vec![(kept_task,)]);
        let team_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(team_count, 0);
    }

    #[tokio::test]
    async fn should_find_projects_by_owner() {
        let (repo, pool, admin_id) = setup().await;
        let owner = User::builder()
            .name("Olive")
            .email("olive@example.com")
            .password_hash("hash")
            .role(Role::Owner)
            .build()
            .unwrap();
        sqlx::query("INSERT INTO users (id, name, email, password_hash, role, is_active) VALUES (?, ?, ?, ?, ?, 1)")
            .bind(owner.id.to_string())
            .bind(&owner.name)
            .bind(&owner.email)
            .bind(&owner.password_hash)
            .bind(owner.role.as_str())
            .execute(&pool)
            .await
            .unwrap();

        let mut owned = test_project(admin_id);
        owned.owner_id = Some(owner.id);
        repo.create(owned.clone()).await.unwrap();
        repo.create(test_project(admin_id)).await.unwrap();

        let found = repo.find_by_owner(owner.id).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, owned.id);
    }

    #[tokio::test]
    async fn should_find_projects_by_team_member() {
        let (repo, pool, admin_id) = setup().await;
        let project = test_project(admin_id);
        repo.create(project.clone()).await.unwrap();
        repo.create(test_project(admin_id)).await.unwrap();
        let team_id = taskhub_domain::id::TeamId::new().to_string();
        sqlx::query("INSERT INTO teams (id, name, project_id, owner_id) VALUES (?, 'Backend', ?, ?)")
            .bind(&team_id)
            .bind(project.id.to_string())
            .bind(admin_id.to_string())
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO team_members (team_id, user_id) VALUES (?, ?)")
            .bind(&team_id)
            .bind(admin_id.to_string())
            .execute(&pool)
            .await
            .unwrap();

        let found = repo.find_by_member(admin_id).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, project.id);
    }

    #[tokio::test]
    async fn should_update_project_fields() {
        let (repo, _pool, admin_id) = setup().await;
        let mut project = test_project(admin_id);
        repo.create(project.clone()).await.unwrap();

        project.name = "Renamed".to_string();
        project.status = ProjectStatus::Completed;
        repo.update(project.clone()).await.unwrap();

        let fetched = repo.get_by_id(project.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Renamed");
        assert_eq!(fetched.status, ProjectStatus::Completed);
    }
}
