//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub story: String,
    pub photo: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}
