//! # Daybook Core
//!
//! The domain layer of the Daybook journaling backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the post/user model, the moderation state machine, the listing query engine
//! (filters, pagination, ordering) and the ports infrastructure must implement.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;

pub use error::DomainError;
