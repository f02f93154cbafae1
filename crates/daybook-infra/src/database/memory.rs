//! In-memory stores - used when no database is configured, and in tests.
//!
//! Every operation takes the lock once, so the per-day uniqueness check on
//! create, owner edits and the moderation transitions are atomic, as they are
//! in Postgres.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use daybook_core::domain::{Post, User};
use daybook_core::error::RepoError;
use daybook_core::ports::{BaseRepository, EditScope, PostRepository, UserRepository};
use daybook_core::query::{PostFilter, StoreOrder};

/// In-memory post store. Natural order is insertion order.
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    /// Matches of `filter` in `order`, cloned out of the store.
    async fn select(&self, filter: &PostFilter, order: StoreOrder) -> Vec<Post> {
        let posts = self.posts.read().await;
        let mut matched: Vec<Post> = posts.iter().filter(|p| filter.matches(p)).cloned().collect();
        match order {
            StoreOrder::CreatedDesc => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            StoreOrder::CreatedAsc => matched.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            StoreOrder::Natural => {}
        }
        matched
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts
            .iter()
            .any(|p| p.user_id == post.user_id && p.created_on == post.created_on)
        {
            return Err(RepoError::Constraint(format!(
                "post for ({}, {}) already exists",
                post.user_id, post.created_on
            )));
        }
        if posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint("duplicate post id".to_string()));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn find_page(
        &self,
        filter: &PostFilter,
        order: StoreOrder,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .select(filter, order)
            .await
            .into_iter()
            .skip(skip)
            .take(take)
            .collect())
    }

    async fn find_all(
        &self,
        filter: &PostFilter,
        order: StoreOrder,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self.select(filter, order).await)
    }

    async fn find_one(&self, id: Uuid, filter: &PostFilter) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .find(|p| p.id == id && filter.matches(p))
            .cloned())
    }

    async fn update_owned(
        &self,
        post: &Post,
        scope: EditScope,
    ) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;
        let Some(slot) = posts
            .iter_mut()
            .find(|p| p.id == post.id && p.user_id == post.user_id)
        else {
            return Ok(None);
        };

        if let EditScope::Visibility { read } = scope {
            if (slot.is_public, slot.is_approved) != read {
                return Ok(None);
            }
            slot.is_public = post.is_public;
            slot.is_approved = post.is_approved;
        }
        slot.description = post.description.clone();
        slot.location = post.location.clone();
        slot.mood = post.mood;
        slot.temperature = post.temperature;
        slot.photo_url = post.photo_url.clone();
        slot.updated_at = post.updated_at;
        Ok(Some(slot.clone()))
    }

    async fn approve_pending(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut posts = self.posts.write().await;
        let approved = posts
            .iter_mut()
            .find(|p| p.id == id)
            .is_some_and(|p| p.approve().is_ok());
        tracing::info!(post_id = %id, approved, "Approve pending post");
        Ok(approved)
    }

    async fn delete_pending(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut posts = self.posts.write().await;
        let position = posts
            .iter()
            .position(|p| p.id == id && p.moderation_state().deny().is_ok());
        let denied = match position {
            Some(index) => {
                posts.remove(index);
                true
            }
            None => false,
        };
        tracing::info!(post_id = %id, denied, "Deny pending post");
        Ok(denied)
    }
}

/// In-memory user store keyed by id.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email already registered".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(RepoError::Constraint("email already registered".to_string()));
        }
        let slot = users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}
