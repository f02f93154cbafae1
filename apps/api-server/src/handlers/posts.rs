//! The caller's own posts.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use daybook_core::domain::{NewPost, PostChanges};
use daybook_core::query::PageRequest;
use daybook_shared::ApiResponse;
use daybook_shared::dto::{
    CreatePostRequest, DayMonthQuery, PageQuery, PostResponse, RangeQuery, SearchQuery,
    UpdatePostRequest,
};

use super::{page_response, photo, post_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/user/posts?page
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let role = identity.role(&state).await?;
    let request = PageRequest::parse(query.page.as_deref());
    let page = state.posts.list_owner_posts(&role, request).await?;

    Ok(HttpResponse::Ok().json(page_response(page, "You have no posts yet.")?))
}

/// POST /api/user/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let role = identity.role(&state).await?;
    let req = body.into_inner();
    let draft = NewPost {
        description: req.description,
        location: req.location,
        mood: req.mood,
        temperature: req.temperature,
        is_public: req.is_public,
    };
    let post = state.posts.create_post(&role, draft).await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// GET /api/user/posts/search?query&page
pub async fn search(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let role = identity.role(&state).await?;
    let request = PageRequest::parse(query.page.as_deref());
    let page = state
        .posts
        .search_owner_posts(&role, query.query.as_deref(), request)
        .await?;

    Ok(HttpResponse::Ok().json(page_response(page, "No posts match your search.")?))
}

/// GET /api/user/posts/on-this-day?day&month
pub async fn on_this_day(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<DayMonthQuery>,
) -> AppResult<HttpResponse> {
    let role = identity.role(&state).await?;
    let posts = state
        .posts
        .list_owner_posts_by_day_month(&role, query.day, query.month)
        .await?;

    if posts.is_empty() {
        return Err(AppError::NotFound(
            "No posts found for this day.".to_string(),
        ));
    }
    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/user/posts/range?startYear&endYear&page
pub async fn range(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<RangeQuery>,
) -> AppResult<HttpResponse> {
    let role = identity.role(&state).await?;
    let request = PageRequest::parse(query.page.as_deref());
    let page = state
        .posts
        .list_owner_posts_in_range(&role, query.start_year, query.end_year, request)
        .await?;

    Ok(HttpResponse::Ok().json(page_response(
        page,
        "No posts found in this date range.",
    )?))
}

/// GET /api/user/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let role = identity.role(&state).await?;
    let post = state.posts.get_owner_post(&role, id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /api/user/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let role = identity.role(&state).await?;
    let req = body.into_inner();
    let changes = PostChanges {
        description: req.description,
        location: req.location,
        mood: req.mood,
        temperature: req.temperature,
        is_public: req.is_public,
    };
    let post = state
        .posts
        .update_post(&role, id.into_inner(), changes)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/user/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let role = identity.role(&state).await?;
    let id = id.into_inner();
    state.posts.delete_post(&role, id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::for_post("Post deleted.", id)))
}

/// PUT /api/user/posts/{id}/photo
pub async fn set_photo(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<Uuid>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let role = identity.role(&state).await?;
    let id = id.into_inner();
    // Ownership is checked before anything is written.
    state.posts.get_owner_post(&role, id).await?;

    let (extension, bytes) = photo::upload(&req, body)?;
    let post = photo::store_and_attach(
        state.blobs.as_ref(),
        identity.user_id,
        extension,
        bytes,
        |url| state.posts.set_post_photo(&role, id, url),
    )
    .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}
