//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

// Accounts

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub photo_url: String,
    pub is_admin: bool,
    pub created_at: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

// Posts

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub mood: i32,
    pub temperature: f64,
    pub photo_url: String,
    pub is_public: bool,
    pub is_approved: bool,
    /// Calendar day of creation, `YYYY-MM-DD`.
    pub created_on: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One page of a listing plus its position in the full result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub items_per_page: u64,
    pub total_items: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub description: String,
    pub location: Option<String>,
    pub mood: i32,
    pub temperature: f64,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub description: Option<String>,
    pub location: Option<String>,
    pub mood: Option<i32>,
    pub temperature: Option<f64>,
    pub is_public: Option<bool>,
}

// Query strings. Numbers stay raw strings so malformed values fall back
// to defaults instead of rejecting the request.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DayMonthQuery {
    pub day: u32,
    pub month: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_year: i32,
    pub end_year: i32,
    pub page: Option<String>,
}
