//! # taskhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository`, `ProjectRepository`, `TaskRepository`,
//!     `TeamRepository` — persistence per resource kind
//!   - `EventPublisher` — fanout of domain events
//!   - `TokenCodec` / `CredentialHasher` — credential issuance and checking
//!   - `Mailer` — best-effort notification transport
//! - Provide **in-process infrastructure** that doesn't need IO:
//!   - `hub::ProjectHub` — the per-project live-subscription registry
//!   - `notify` — the fire-and-forget email queue and its worker
//! - Provide the **resource lifecycle services** (`services` module) that
//!   validate payloads, consult the access evaluator, mutate through the
//!   repositories, and emit domain events
//!
//! ## Dependency rule
//! Depends on `taskhub-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod hub;
pub mod notify;
pub mod ports;
pub mod services;
