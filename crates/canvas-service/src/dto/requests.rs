//! Request DTOs for API endpoints
//!
//! JSON bodies implement `Deserialize` and `Validate`. Blank-after-trim checks that
//! `validator` cannot express live in the services.

use canvas_core::{Role, Snowflake};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Account registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// `artist`, `buyer` or `admin`
    #[serde(rename = "type")]
    pub role: Role,

    #[validate(length(max = 100, message = "Specialization must be at most 100 characters"))]
    pub specialization: Option<String>,

    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Please provide email and password."))]
    pub email: String,

    #[validate(length(min = 1, message = "Please provide email and password."))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,
}

// ============================================================================
// Community Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCommunityRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,
}

/// Body of approve-member / reject-member
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberActionRequest {
    pub member_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommunityListQuery {
    pub search: Option<String>,
}

// ============================================================================
// Message Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[serde(default)]
    #[validate(length(max = 4000, message = "Message must be at most 4000 characters"))]
    pub content: String,
}

/// Polling cursor for the message feed
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MessagesQuery {
    /// Only messages with a larger id
    pub after: Option<Snowflake>,
}

// ============================================================================
// Artwork Requests
// ============================================================================

/// Optional note attached to a purchase inquiry
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct PurchaseRequest {
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: Option<String>,
}
