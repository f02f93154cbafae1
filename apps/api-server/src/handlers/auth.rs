//! Authentication handlers.

use actix_web::{HttpResponse, web};

use daybook_core::services::Session;
use daybook_shared::ApiResponse;
use daybook_shared::dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterUserRequest, ResetPasswordRequest,
};

use super::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(session: Session) -> AuthResponse {
    AuthResponse {
        access_token: session.access_token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in.max(0) as u64,
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.accounts.register(&req.email, &req.password).await?;

    Ok(HttpResponse::Created().json(auth_response(session)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.accounts.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(auth_response(session)))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> AppResult<HttpResponse> {
    state.accounts.forgot_password(&body.email).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "Password reset link has been sent to your email.",
    )))
}

/// POST /api/auth/reset-password/{token}
pub async fn reset_password(
    state: web::Data<AppState>,
    token: web::Path<String>,
    body: web::Json<ResetPasswordRequest>,
) -> AppResult<HttpResponse> {
    state
        .accounts
        .reset_password(&token, &body.password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "Password has been reset successfully.",
    )))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.get_user(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}
