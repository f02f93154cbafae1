//! Moderation queue. Every handler passes the admin gate first.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use daybook_core::query::PageRequest;
use daybook_shared::ApiResponse;
use daybook_shared::dto::PageQuery;

use super::{page_response, post_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/posts/pending?page
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let grant = identity.admin_grant(&state).await?;
    let request = PageRequest::parse(query.page.as_deref());
    let page = state.posts.list_pending(&grant, request).await?;

    Ok(HttpResponse::Ok().json(page_response(page, "No pending posts found.")?))
}

/// GET /api/admin/posts/pending/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let grant = identity.admin_grant(&state).await?;
    let post = state.posts.get_pending(&grant, id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /api/admin/posts/pending/{id}/approve
pub async fn approve(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let grant = identity.admin_grant(&state).await?;
    let id = id.into_inner();
    state.posts.approve(&grant, id).await?;
    tracing::info!(post_id = %id, admin_id = %grant.admin_id(), "Post approved");

    Ok(HttpResponse::Ok().json(ApiResponse::for_post("Post approved.", id)))
}

/// DELETE /api/admin/posts/pending/{id}/deny
pub async fn deny(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let grant = identity.admin_grant(&state).await?;
    let id = id.into_inner();
    state.posts.deny(&grant, id).await?;
    tracing::info!(post_id = %id, admin_id = %grant.admin_id(), "Post denied");

    Ok(HttpResponse::Ok().json(ApiResponse::for_post("Post denied and deleted.", id)))
}
