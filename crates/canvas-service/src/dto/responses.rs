//! Response DTOs for API endpoints
//!
//! Field names are camelCase on the wire. Snowflake ids serialize as strings.

use canvas_core::{ApprovalStatus, Role, Snowflake};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Success envelope: `{"status": "success", "message"?, "data"}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data,
        }
    }
}

/// Success envelope with only a message
#[derive(Debug, Serialize)]
pub struct MessageOnlyResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageOnlyResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// Full profile of an account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub status: ApprovalStatus,
    pub artwork_count: i32,
    pub badges: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Name tag used wherever a user is referenced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: Snowflake,
    pub name: String,
}

/// Member and pending lists show contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub status: &'static str,
    pub message: String,
    pub user: UserResponse,
}

/// Issued session, also set as a cookie by the API layer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    pub name: String,
    /// e.g. "3 Artworks"
    pub earned_at: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgesResponse {
    pub artwork_count: i64,
    pub badges: Vec<BadgeResponse>,
}

// ============================================================================
// Community Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityResponse {
    pub id: Snowflake,
    pub name: String,
    pub description: String,
    pub creator: UserSummary,
    pub member_count: i32,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityDetailResponse {
    #[serde(flatten)]
    pub community: CommunityResponse,
    pub members: Vec<MemberSummary>,
    /// `non_member`, `pending`, `member` or `creator`
    pub access: &'static str,
    /// Only present for the creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_members: Option<Vec<MemberSummary>>,
}

/// Outcome of a membership transition
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub status: &'static str,
    pub message: String,
    pub community_id: Snowflake,
    pub member_count: i32,
    /// Membership lists are only returned to the creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Snowflake>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_members: Option<Vec<Snowflake>>,
}

// ============================================================================
// Message Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Snowflake,
    pub community_id: Snowflake,
    pub author: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Artwork Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkResponse {
    pub id: Snowflake,
    pub title: String,
    pub description: String,
    pub photo: String,
    pub price: f64,
    pub is_biddable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidding_end_time: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub current_bid: f64,
    pub artist: UserSummary,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedArtworkResponse {
    pub artwork: ArtworkResponse,
    /// Owner's running total after this upload
    pub artwork_count: i32,
    /// Badges unlocked by this upload
    pub new_badges: Vec<String>,
}

// ============================================================================
// Post Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Snowflake,
    pub title: String,
    pub description: String,
    pub story: String,
    pub photo_url: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Admin Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_buyers: i64,
    pub total_artists: i64,
    pub total_artworks: i64,
    pub total_communities: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityRanking {
    pub id: Snowflake,
    pub name: String,
    pub member_count: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyMessages {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRankingResponse {
    pub name: String,
    pub artwork_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagShare {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub top_communities: Vec<CommunityRanking>,
    pub messages_over_time: Vec<DailyMessages>,
    pub top_artists: Vec<ArtistRankingResponse>,
    pub artwork_by_category: Vec<TagShare>,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: &'static str,
}
