//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of `users` without the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub artwork_count: i32,
    pub badges: Vec<String>,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
