//! Resource lifecycle services — one per resource kind, plus identity.
//!
//! Each service is stateless across requests: it validates the payload,
//! consults the access evaluator, mutates through the repository ports,
//! and emits the domain event only after the mutation has been persisted.

pub mod auth_service;
pub mod project_service;
pub mod task_service;
pub mod team_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod memory;
