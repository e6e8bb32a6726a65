//! `SQLite` implementation of [`TeamRepository`].
//!
//! Membership lives in the `team_members` join table; rows are loaded back
//! in insertion order so `Team::member_ids` round-trips.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use taskhub_app::ports::TeamRepository;
use taskhub_domain::error::TaskHubError;
use taskhub_domain::id::{ProjectId, TeamId, UserId};
use taskhub_domain::team::Team;

use crate::error::StorageError;

/// A `teams` row without its membership; members are attached afterwards.
struct Wrapper(Team);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let project_id: String = row.try_get("project_id")?;
        let owner_id: String = row.try_get("owner_id")?;

        let id = TeamId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let project_id =
            ProjectId::from_str(&project_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let owner_id =
            UserId::from_str(&owner_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Team {
            id,
            name: row.try_get("name")?,
            project_id,
            owner_id,
            member_ids: Vec::new(),
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO teams (id, name, project_id, owner_id)
    VALUES (?, ?, ?, ?)
";

const INSERT_MEMBER: &str = "INSERT INTO team_members (team_id, user_id) VALUES (?, ?)";

const SELECT_BY_ID: &str = "SELECT * FROM teams WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM teams";
const SELECT_BY_OWNER: &str = "SELECT * FROM teams WHERE owner_id = ?";

const SELECT_BY_MEMBER: &str = r"
    SELECT t.*
    FROM teams t
    JOIN team_members m ON m.team_id = t.id
    WHERE m.user_id = ?
";

const SELECT_MEMBERS: &str = r"
    SELECT user_id FROM team_members WHERE team_id = ? ORDER BY rowid
";

const DELETE_MEMBER: &str = "DELETE FROM team_members WHERE team_id = ? AND user_id = ?";

const EXISTS_PROJECT_MEMBER: &str = r"
    SELECT EXISTS (
        SELECT 1
        FROM team_members m
        JOIN teams t ON t.id = m.team_id
        WHERE t.project_id = ? AND m.user_id = ?
    )
";

const COUNT: &str = "SELECT COUNT(*) FROM teams";

/// `SQLite`-backed team repository.
#[derive(Clone)]
pub struct SqliteTeamRepository {
    pool: SqlitePool,
}

impl SqliteTeamRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_members(&self, team_id: TeamId) -> Result<Vec<UserId>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as(SELECT_MEMBERS)
            .bind(team_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|(raw,)| UserId::from_str(raw).map_err(|err| sqlx::Error::Decode(Box::new(err))))
            .collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::from)
    }

    async fn hydrate(&self, rows: Vec<Wrapper>) -> Result<Vec<Team>, TaskHubError> {
        let mut teams = Vec::with_capacity(rows.len());
        for Wrapper(mut team) in rows {
            team.member_ids = self.load_members(team.id).await?;
            teams.push(team);
        }
        Ok(teams)
    }
}

impl TeamRepository for SqliteTeamRepository {
    async fn create(&self, team: Team) -> Result<Team, TaskHubError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(team.id.to_string())
            .bind(&team.name)
            .bind(team.project_id.to_string())
            .bind(team.owner_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        for member_id in &team.member_ids {
            sqlx::query(INSERT_MEMBER)
                .bind(team.id.to_string())
                .bind(member_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(team)
    }

    async fn get_by_id(&self, id: TeamId) -> Result<Option<Team>, TaskHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        match row {
            Some(Wrapper(mut team)) => {
                team.member_ids = self.load_members(team.id).await?;
                Ok(Some(team))
            }
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Team>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        self.hydrate(rows).await
    }

    async fn find_by_owner(&self, owner_id: UserId) -> Result<Vec<Team>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_OWNER)
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        self.hydrate(rows).await
    }

    async fn find_by_member(&self, user_id: UserId) -> Result<Vec<Team>, TaskHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_MEMBER)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        self.hydrate(rows).await
    }

    async fn add_member(&self, team_id: TeamId, user_id: UserId) -> Result<(), TaskHubError> {
        sqlx::query(INSERT_MEMBER)
            .bind(team_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> Result<(), TaskHubError> {
        sqlx::query(DELETE_MEMBER)
            .bind(team_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn is_member_of_project(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<bool, TaskHubError> {
        let exists: bool = sqlx::query_scalar(EXISTS_PROJECT_MEMBER)
            .bind(project_id.to_string())
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(exists)
    }

    async fn count(&self) -> Result<u64, TaskHubError> {
        let count: i64 = sqlx::query_scalar(COUNT)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(count.unsigned_abs())
    }
}
