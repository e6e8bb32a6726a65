//! # taskhub-adapter-auth-jwt
//!
//! Credential adapter implementing the ports defined in
//! `taskhub-app::ports::credentials`:
//!
//! - [`JwtCodec`] — signed, time-limited HS256 bearer tokens carrying the
//!   subject's normalized email and role
//! - [`Argon2Hasher`] — Argon2id password hashing with per-password salts
//!
//! ## Dependency rule
//! Depends on `taskhub-app` (for port traits) and `taskhub-domain` (for
//! error types). The `app` and `domain` crates must never reference this
//! adapter.

pub mod hasher;
pub mod token;

pub use hasher::Argon2Hasher;
pub use token::JwtCodec;
