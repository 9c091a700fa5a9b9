//! Artwork entity - a watermarked piece listed by an artist

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::Snowflake;

pub const MIN_BIDDING_DAYS: i64 = 1;
pub const MAX_BIDDING_DAYS: i64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    pub id: Snowflake,
    pub owner_id: Snowflake,
    pub title: String,
    pub description: String,
    /// Public path of the watermarked asset
    pub photo: String,
    pub price: f64,
    pub is_biddable: bool,
    pub bidding_end_time: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub current_bid: f64,
    pub created_at: DateTime<Utc>,
}

impl Artwork {
    #[inline]
    pub fn is_owned_by(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }
}

/// End of a bidding window of `days`, clamped to the allowed range
pub fn bidding_window_end(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days.clamp(MIN_BIDDING_DAYS, MAX_BIDDING_DAYS))
}
