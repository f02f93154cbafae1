//! The caller's account profile.

use actix_web::{HttpRequest, HttpResponse, web};

use daybook_core::services::ProfileChanges;
use daybook_shared::dto::UpdateProfileRequest;

use super::{photo, user_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/user/profile
pub async fn get(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.get_user(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}

/// PUT /api/user/profile
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = ProfileChanges {
        email: req.email,
        password: req.password,
    };
    let user = state
        .accounts
        .update_profile(identity.user_id, changes)
        .await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}

/// PUT /api/user/profile/photo
pub async fn set_photo(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let user = state.accounts.get_user(identity.user_id).await?;

    let (extension, bytes) = photo::upload(&req, body)?;
    let user = photo::store_and_attach(state.blobs.as_ref(), user.id, extension, bytes, |url| {
        state.accounts.set_profile_photo(user.id, url)
    })
    .await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}
