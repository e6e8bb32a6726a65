//! `SQLite` implementation of [`TaskRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use taskhub_app::ports::TaskRepository;
use taskhub_domain::error::TaskHubError;
use taskhub_domain::id::{ProjectId, TaskId, UserId};
use taskhub_domain::task::{Task, TaskStatus};

use crate::error::StorageError;

struct Wrapper(Task);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Task> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let status: String = row.try_get("status")?;
        let project_id: String = row.try_get("project_id")?;
        let assigned_to_id: Option<String> = row.try_get("assigned_to_id")?;

        let id = TaskId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let status =
            TaskStatus::from_str(&status).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let project_id =
            ProjectId::from_str(&project_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let assigned_to_id = assigned_to_id
            .map(|raw| UserId::from_str(&raw))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Task {
            id,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status,
            project_id,
            assigned_to_id,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO tasks (id, title, description, status, project_id, assigned_to_id)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM tasks WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM tasks";
const SELECT_BY_PROJECT: &str = "SELECT * FROM tasks WHERE project_id = ?";
const SELECT_BY_ASSIGNEE: &str = "SELECT * FROM tasks WHERE assigned_to_id = ?";

const SELECT_BY_PROJECT_OWNER: &str = r"
    SELECT t.*
    FROM tasks t
    JOIN projects p ON p.id = t.project_id
    WHERE p.owner_id = ?
";

const SELECT_BY_TEAM_MEMBER: &str = r"
    SELECT DISTINCT t.*
    FROM tasks t
    JOIN teams tm ON tm.project_id = t.project_id
    JOIN team_members m ON m.team_id = tm.id
    WHERE m.user_id = ?
";

const UPDATE: &str = r"
    UPDATE tasks
    SET title = ?, description = ?, status = ?, assigned_to_id = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM tasks WHERE id = ?";

const COUNT: &str = "SELECT COUNT(*) FROM tasks";

/// `SQLite`-backed task repository.
#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, TaskHubError> {
        sqlx::query(INSERT)
            .bind(task.id.to_string())
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.as_str())
            .bind(task.project_id.to_string())
            .bind(task.assigned_to_id.map(|id| id.to_string()))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(task)
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Task>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> Result<Vec<Task>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_PROJECT)
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_project_owner(&self, owner_id: UserId) -> Result<Vec<Task>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_PROJECT_OWNER)
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_assignee(&self, user_id: UserId) -> Result<Vec<Task>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ASSIGNEE)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_team_member(&self, user_id: UserId) -> Result<Vec<Task>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_TEAM_MEMBER)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, task: Task) -> Result<Task, TaskHubError> {
        sqlx::query(UPDATE)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.as_str())
            .bind(task.assigned_to_id.map(|id| id.to_string()))
            .bind(task.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> Result<(), TaskHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

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
