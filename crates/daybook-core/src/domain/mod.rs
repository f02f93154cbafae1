//! Domain entities - the core business objects.

mod moderation;
mod post;
mod role;
mod user;

pub use moderation::{ModerationState, TransitionError};
pub use post::{MOOD_RANGE, NewPost, Post, PostChanges};
pub use role::{AdminGrant, Role};
pub use user::User;
