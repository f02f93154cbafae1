use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;
use crate::query::{PostFilter, StoreOrder};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-key collisions surface as `RepoError::Constraint`.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Missing rows surface as `RepoError::NotFound`.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Columns an owner edit may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditScope {
    /// Description, location, mood, temperature, photo and `updated_at`.
    Content,
    /// Content plus the moderation flags, applied only while the stored
    /// `(is_public, is_approved)` pair still equals `read`.
    Visibility { read: (bool, bool) },
}

/// Post store queried by every listing.
///
/// `create` must reject a second post by the same owner on the same
/// `created_on` day with `RepoError::Constraint`.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Number of posts matching `filter`, ignoring any window.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Up to `limit` matches starting at `offset`, in `order`.
    async fn find_page(
        &self,
        filter: &PostFilter,
        order: StoreOrder,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Every match, unpaged.
    async fn find_all(&self, filter: &PostFilter, order: StoreOrder)
    -> Result<Vec<Post>, RepoError>;

    /// The post with `id`, only if it also matches `filter`.
    async fn find_one(&self, id: Uuid, filter: &PostFilter) -> Result<Option<Post>, RepoError>;

    /// Write an owner edit of `post` as a single conditional statement.
    ///
    /// The row must still belong to `post.user_id`. Returns the stored post
    /// after the write, or `None` when no row matched.
    async fn update_owned(&self, post: &Post, scope: EditScope)
    -> Result<Option<Post>, RepoError>;

    /// Atomically approve `id` if it is pending. Returns whether a post moved.
    async fn approve_pending(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Atomically delete `id` if it is pending. Returns whether a post was removed.
    async fn delete_pending(&self, id: Uuid) -> Result<bool, RepoError>;
}
