//! Application services - the operations the HTTP layer calls.

mod accounts;
mod posts;

pub use accounts::{AccountService, ProfileChanges, Session};
pub use posts::PostService;
