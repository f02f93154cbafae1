//! Post listing, ownership and moderation operations.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AdminGrant, NewPost, Post, PostChanges, Role};
use crate::error::{DomainError, RepoError};
use crate::ports::{EditScope, PostRepository};
use crate::query::{DateFilter, Page, PageRequest, PostFilter, Scope, SortOrder, paginate};

const ENTITY: &str = "Post";

/// Re-reads allowed when moderation races an owner edit.
const MAX_EDIT_ATTEMPTS: usize = 3;

/// Core entry point used by the HTTP handlers.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    async fn page(
        &self,
        filter: PostFilter,
        order: SortOrder,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        Ok(paginate(self.repo.as_ref(), &filter, order, request).await?)
    }

    async fn find_scoped(&self, id: Uuid, scope: Scope) -> Result<Post, DomainError> {
        self.repo
            .find_one(id, &PostFilter::new(scope))
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    // Guest listings

    /// Approved public posts in `order`.
    pub async fn list_public(
        &self,
        order: SortOrder,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.page(PostFilter::new(Scope::PublicApproved), order, request)
            .await
    }

    /// Approved public posts whose description or location contains `keyword`.
    pub async fn search_public(
        &self,
        keyword: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let filter = PostFilter::new(Scope::PublicApproved).with_keyword(keyword);
        self.page(filter, SortOrder::Natural, request).await
    }

    pub async fn get_public(&self, id: Uuid) -> Result<Post, DomainError> {
        self.find_scoped(id, Scope::PublicApproved).await
    }

    // Moderation

    /// Moderation queue, newest first.
    pub async fn list_pending(
        &self,
        _grant: &AdminGrant,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.page(PostFilter::new(Scope::PublicPending), SortOrder::Newest, request)
            .await
    }

    pub async fn get_pending(&self, _grant: &AdminGrant, id: Uuid) -> Result<Post, DomainError> {
        self.find_scoped(id, Scope::PublicPending).await
    }

    /// Pending → Approved. Anything else is reported as not found.
    pub async fn approve(&self, _grant: &AdminGrant, id: Uuid) -> Result<(), DomainError> {
        if self.repo.approve_pending(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Pending post", id))
        }
    }

    /// Pending → Denied, which deletes the post.
    pub async fn deny(&self, _grant: &AdminGrant, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete_pending(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Pending post", id))
        }
    }

    // Owner posts

    /// Create today's post for the caller.
    pub async fn create_post(&self, role: &Role, draft: NewPost) -> Result<Post, DomainError> {
        let owner = role.principal()?;
        let post = Post::new(owner, draft)?;
        self.repo.create(post).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::validation("You have already created a post today.")
            }
            other => other.into(),
        })
    }

    pub async fn get_owner_post(&self, role: &Role, id: Uuid) -> Result<Post, DomainError> {
        self.find_scoped(id, Scope::Owner(role.principal()?)).await
    }

    /// Every post of the caller, newest first.
    pub async fn list_owner_posts(
        &self,
        role: &Role,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.search_owner_posts(role, None, request).await
    }

    pub async fn search_owner_posts(
        &self,
        role: &Role,
        keyword: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let filter = PostFilter::new(Scope::Owner(role.principal()?)).with_keyword(keyword);
        self.page(filter, SortOrder::Newest, request).await
    }

    /// "On this day": the caller's posts from `day`/`month` of any year.
    pub async fn list_owner_posts_by_day_month(
        &self,
        role: &Role,
        day: u32,
        month: u32,
    ) -> Result<Vec<Post>, DomainError> {
        let filter = PostFilter::new(Scope::Owner(role.principal()?))
            .with_date(DateFilter::day_month(day, month)?);
        Ok(self
            .repo
            .find_all(&filter, SortOrder::Newest.store_order())
            .await?)
    }

    /// The caller's posts created between `start_year` and `end_year` inclusive.
    pub async fn list_owner_posts_in_range(
        &self,
        role: &Role,
        start_year: i32,
        end_year: i32,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let filter = PostFilter::new(Scope::Owner(role.principal()?))
            .with_date(DateFilter::year_range(start_year, end_year)?);
        self.page(filter, SortOrder::Newest, request).await
    }

    /// Apply an owner edit.
    ///
    /// Edits that leave visibility alone only write content columns, so a
    /// concurrent approval survives them. Visibility edits are written only
    /// while the stored flags match the ones they were computed from; a
    /// moderation action in between causes a re-read.
    pub async fn update_post(
        &self,
        role: &Role,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        for _ in 0..MAX_EDIT_ATTEMPTS {
            let mut post = self.get_owner_post(role, id).await?;
            let scope = match changes.is_public {
                Some(_) => EditScope::Visibility {
                    read: (post.is_public, post.is_approved),
                },
                None => EditScope::Content,
            };
            post.apply_changes(changes.clone())?;

            if let Some(stored) = self.repo.update_owned(&post, scope).await? {
                return Ok(stored);
            }
            tracing::debug!(post_id = %id, "Post changed during edit, retrying");
        }
        Err(DomainError::Internal(format!(
            "post {id} kept changing during edit"
        )))
    }

    /// Point the post at an uploaded photo. Moderation flags are left as stored.
    pub async fn set_post_photo(
        &self,
        role: &Role,
        id: Uuid,
        photo_url: String,
    ) -> Result<Post, DomainError> {
        let mut post = self.get_owner_post(role, id).await?;
        post.set_photo(photo_url);
        self.repo
            .update_owned(&post, EditScope::Content)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    pub async fn delete_post(&self, role: &Role, id: Uuid) -> Result<(), DomainError> {
        let post = self.get_owner_post(role, id).await?;
        self.repo.delete(post.id).await?;
        Ok(())
    }
}
