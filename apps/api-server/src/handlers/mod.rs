//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod guest;
mod health;
mod photo;
mod posts;
mod profile;

use actix_web::web;

use daybook_core::domain::{Post, User};
use daybook_core::query::Page;
use daybook_shared::dto::{PageResponse, PostResponse, UserResponse};

use crate::middleware::error::{AppError, AppResult};

/// Configure all application routes.
///
/// Literal segments are registered before `{id}` so `search` and friends
/// never reach the id parser.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(photo::MAX_PHOTO_BYTES));
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/forgot-password", web::post().to(auth::forgot_password))
                    .route(
                        "/reset-password/{token}",
                        web::post().to(auth::reset_password),
                    )
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/guest/public-posts")
                    .route("/random", web::get().to(guest::random))
                    .route("/search", web::get().to(guest::search))
                    .route("/sorted/{order}", web::get().to(guest::sorted))
                    .route("/{id}", web::get().to(guest::get)),
            )
            .service(
                web::scope("/user")
                    .service(
                        web::scope("/posts")
                            .route("", web::get().to(posts::list))
                            .route("", web::post().to(posts::create))
                            .route("/search", web::get().to(posts::search))
                            .route("/on-this-day", web::get().to(posts::on_this_day))
                            .route("/range", web::get().to(posts::range))
                            .route("/{id}", web::get().to(posts::get))
                            .route("/{id}", web::put().to(posts::update))
                            .route("/{id}", web::delete().to(posts::delete))
                            .route("/{id}/photo", web::put().to(posts::set_photo)),
                    )
                    .route("/profile", web::get().to(profile::get))
                    .route("/profile", web::put().to(profile::update))
                    .route("/profile/photo", web::put().to(profile::set_photo)),
            )
            .service(
                web::scope("/admin/posts/pending")
                    .route("", web::get().to(admin::list))
                    .route("/{id}", web::get().to(admin::get))
                    .route("/{id}/approve", web::put().to(admin::approve))
                    .route("/{id}/deny", web::delete().to(admin::deny)),
            ),
    );
}

pub(crate) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        user_id: post.user_id.to_string(),
        description: post.description,
        location: post.location,
        mood: post.mood,
        temperature: post.temperature,
        photo_url: post.photo_url,
        is_public: post.is_public,
        is_approved: post.is_approved,
        created_on: post.created_on.to_string(),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

pub(crate) fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        email: user.email,
        photo_url: user.photo_url,
        is_admin: user.is_admin,
        created_at: user.created_at.to_rfc3339(),
    }
}

/// Render a listing page; an empty window becomes a 404 carrying `empty_message`.
pub(crate) fn page_response(
    page: Page<Post>,
    empty_message: &str,
) -> AppResult<PageResponse<PostResponse>> {
    if page.is_empty() {
        return Err(AppError::NotFound(empty_message.to_string()));
    }

    let page = page.map(post_response);
    Ok(PageResponse {
        items: page.items,
        current_page: page.current_page,
        total_pages: page.total_pages,
        items_per_page: page.items_per_page,
        total_items: page.total_items,
    })
}

#[cfg(test)]
mod tests;
