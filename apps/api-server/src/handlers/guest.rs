//! Public feed: approved public posts, readable without a token.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use daybook_core::query::{PageRequest, SortOrder};
use daybook_shared::dto::{PageQuery, SearchQuery};

use super::{page_response, post_response};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const NO_POSTS: &str = "No public posts found.";

/// GET /api/guest/public-posts/random?page
pub async fn random(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::parse(query.page.as_deref());
    let page = state.posts.list_public(SortOrder::Random, request).await?;

    Ok(HttpResponse::Ok().json(page_response(page, NO_POSTS)?))
}

/// GET /api/guest/public-posts/search?query&page
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::parse(query.page.as_deref());
    let page = state
        .posts
        .search_public(query.query.as_deref(), request)
        .await?;

    Ok(HttpResponse::Ok().json(page_response(
        page,
        "No public posts match your search.",
    )?))
}

/// GET /api/guest/public-posts/sorted/{newest|oldest|random}?page
pub async fn sorted(
    state: web::Data<AppState>,
    order: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let order = order
        .parse::<SortOrder>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let request = PageRequest::parse(query.page.as_deref());
    let page = state.posts.list_public(order, request).await?;

    Ok(HttpResponse::Ok().json(page_response(page, NO_POSTS)?))
}

/// GET /api/guest/public-posts/{id}
pub async fn get(state: web::Data<AppState>, id: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get_public(id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}
