//! Confirmation and error bodies (RFC 7807 for errors).

use serde::{Deserialize, Serialize};

/// Body of an action that has no resource to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    /// Post the action was applied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
}

impl ApiResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            post_id: None,
        }
    }

    /// Confirmation of a moderation or deletion on one post.
    pub fn for_post(message: impl Into<String>, post_id: impl ToString) -> Self {
        Self {
            post_id: Some(post_id.to_string()),
            ..Self::message(message)
        }
    }
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `about:blank`; `title` carries the HTTP reason phrase.
    #[serde(rename = "type")]
    pub error_type: String,

    pub title: String,

    pub status: u16,

    /// User-facing message, e.g. "No public posts found.".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: &str) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.to_string(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(403, "Forbidden").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    /// Duplicate account email.
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    /// Photo upload that is not an accepted image type.
    pub fn unsupported_media_type(detail: impl Into<String>) -> Self {
        Self::new(415, "Unsupported Media Type").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_details_skip_empty_detail() {
        let json = serde_json::to_value(ErrorResponse::not_found("No public posts found.")).unwrap();

        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["status"], 404);
        assert_eq!(json["detail"], "No public posts found.");

        let json = serde_json::to_value(ErrorResponse::unauthorized()).unwrap();
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn post_confirmation_names_the_post() {
        let json = serde_json::to_value(ApiResponse::for_post("Post approved.", 42)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Post approved.");
        assert_eq!(json["postId"], "42");
    }

    #[test]
    fn plain_confirmation_has_no_post_id() {
        let json = serde_json::to_value(ApiResponse::message("Password has been reset successfully."))
            .unwrap();

        assert!(json.get("postId").is_none());
    }
}
