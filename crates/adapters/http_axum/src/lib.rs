//! # taskhub-adapter-http-axum
//!
//! HTTP adapter using [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON REST API under `/api`
//! - Resolve bearer tokens to authenticated actors (`auth` module)
//! - Map [`TaskHubError`](taskhub_domain::error::TaskHubError) variants to
//!   stable HTTP status codes (`error` module)
//! - Serve the per-project WebSocket event stream (`ws` module)
//!
//! ## Dependency rule
//! Depends on `taskhub-app` (for services and ports) and `taskhub-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod state;
pub mod ws;

pub use router::build;
pub use state::AppState;
