//! # taskhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `taskhub-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `taskhub-app` (for port traits) and `taskhub-domain` (for domain
//! types). The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod project_repo;
pub mod task_repo;
pub mod team_repo;
pub mod user_repo;

pub use pool::{Config, Database};
pub use project_repo::SqliteProjectRepository;
pub use task_repo::SqliteTaskRepository;
pub use team_repo::SqliteTeamRepository;
pub use user_repo::SqliteUserRepository;
