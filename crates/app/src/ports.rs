//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod credentials;
pub mod event_bus;
pub mod mailer;
pub mod storage;

pub use credentials::{Claims, CredentialHasher, TokenCodec};
pub use event_bus::EventPublisher;
pub use mailer::{Email, Mailer};
pub use storage::{ProjectRepository, TaskRepository, TeamRepository, UserRepository};
