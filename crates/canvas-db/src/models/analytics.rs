//! Aggregate rows for the admin dashboard

use chrono::NaiveDate;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DailyCountModel {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct ArtistRankingModel {
    pub name: String,
    pub artwork_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct TagCountModel {
    pub name: String,
    pub value: i64,
}
