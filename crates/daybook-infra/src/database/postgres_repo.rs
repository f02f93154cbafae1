//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use daybook_core::domain::{Post, User};
use daybook_core::error::RepoError;
use daybook_core::ports::{BaseRepository, EditScope, PostRepository, UserRepository};
use daybook_core::query::{PostFilter, Scope, StoreOrder};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::post_query::{condition, ordered, scope_condition, select};
use super::postgres_base::{PostgresBaseRepository, map_db_err};
use crate::pii::mask_email;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        select(filter).count(&self.db).await.map_err(map_db_err)
    }

    async fn find_page(
        &self,
        filter: &PostFilter,
        order: StoreOrder,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(?filter, ?order, offset, limit, "Fetching post window");

        let result = ordered(select(filter), order)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_all(
        &self,
        filter: &PostFilter,
        order: StoreOrder,
    ) -> Result<Vec<Post>, RepoError> {
        let result = ordered(select(filter), order)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_one(&self, id: Uuid, filter: &PostFilter) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(condition(filter))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update_owned(
        &self,
        post: &Post,
        scope: EditScope,
    ) -> Result<Option<Post>, RepoError> {
        let updated_at: DateTimeWithTimeZone = post.updated_at.into();
        let mut update = PostEntity::update_many()
            .col_expr(post::Column::Description, Expr::value(post.description.clone()))
            .col_expr(post::Column::Location, Expr::value(post.location.clone()))
            .col_expr(post::Column::Mood, Expr::value(post.mood))
            .col_expr(post::Column::Temperature, Expr::value(post.temperature))
            .col_expr(post::Column::PhotoUrl, Expr::value(post.photo_url.clone()))
            .col_expr(post::Column::UpdatedAt, Expr::value(updated_at))
            .filter(post::Column::Id.eq(post.id))
            .filter(post::Column::UserId.eq(post.user_id));

        if let EditScope::Visibility {
            read: (was_public, was_approved),
        } = scope
        {
            update = update
                .col_expr(post::Column::IsPublic, Expr::value(post.is_public))
                .col_expr(post::Column::IsApproved, Expr::value(post.is_approved))
                .filter(post::Column::IsPublic.eq(was_public))
                .filter(post::Column::IsApproved.eq(was_approved));
        }

        let result = update.exec(&self.db).await.map_err(map_db_err)?;
        tracing::debug!(post_id = %post.id, ?scope, rows = result.rows_affected, "Owner edit");
        if result.rows_affected == 0 {
            return Ok(None);
        }

        <Self as BaseRepository<Post, Uuid>>::find_by_id(self, post.id).await
    }

    async fn approve_pending(&self, id: Uuid) -> Result<bool, RepoError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = PostEntity::update_many()
            .col_expr(post::Column::IsApproved, Expr::value(true))
            .col_expr(post::Column::UpdatedAt, Expr::value(now))
            .filter(post::Column::Id.eq(id))
            .filter(scope_condition(Scope::PublicPending))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        let approved = result.rows_affected > 0;
        tracing::info!(post_id = %id, approved, "Approve pending post");
        Ok(approved)
    }

    async fn delete_pending(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(scope_condition(Scope::PublicPending))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        let denied = result.rows_affected > 0;
        tracing::info!(post_id = %id, denied, "Deny pending post");
        Ok(denied)
    }
}
