//! # Daybook Infrastructure
//!
//! Concrete implementations of the ports defined in `daybook-core`.
//! This crate contains the post/user stores, authentication, mail delivery
//! and photo storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `mail` - HTTP mail provider delivery via reqwest

pub mod database;
pub mod notification;
pub mod storage;

mod pii;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConnections, InMemoryPostRepository, InMemoryUserRepository};
pub use notification::LogMailer;
pub use storage::LocalBlobStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService, PasswordPolicy};

#[cfg(feature = "mail")]
pub use notification::{HttpMailer, HttpMailerConfig};
