//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod notification;
mod repository;
mod storage;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use notification::{MailMessage, Mailer, NotifyError};
pub use repository::{BaseRepository, EditScope, PostRepository, UserRepository};
pub use storage::{BlobStore, StorageError};
