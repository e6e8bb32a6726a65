//! # taskhub-domain
//!
//! Pure domain model for the taskhub collaboration backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and the error taxonomy
//! - Define **Users** (identity, role, credential hash)
//! - Define **Projects** (name, status, admin and optional owner references)
//! - Define **Teams** (project-scoped membership sets)
//! - Define **Tasks** (project-scoped work items with optional assignee)
//! - Define **Domain events** (ephemeral state-change records for fanout)
//! - The **access** module: the single role-based authorization decision
//!   table consulted by every use-case
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod access;
pub mod error;
pub mod event;
pub mod id;
pub mod project;
pub mod role;
pub mod task;
pub mod team;
pub mod user;
