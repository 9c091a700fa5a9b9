//! Artwork database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ArtworkModel {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub photo: String,
    pub price: f64,
    pub is_biddable: bool,
    pub bidding_end_time: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub current_bid: f64,
    pub created_at: DateTime<Utc>,
}
