//! Community database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of `communities` with both membership sets aggregated into arrays
#[derive(Debug, Clone, FromRow)]
pub struct CommunityModel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub creator_id: i64,
    pub member_count: i32,
    pub status: String,
    pub members: Vec<i64>,
    pub pending_members: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
