//! Post entity - a photo story shared on the public board

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

pub const MAX_POST_TITLE: usize = 100;
pub const MAX_POST_DESCRIPTION: usize = 300;
pub const MAX_POST_STORY: usize = 500;
pub const MAX_POST_TAGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub title: String,
    pub description: String,
    pub story: String,
    /// Public path of the photo, stored as uploaded
    pub photo: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Trim a required post field and enforce its length limit in characters
pub fn normalize_post_field(field: &str, raw: &str, max: usize) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError(format!(
            "Please provide the post {field}."
        )));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::ValidationError(format!(
            "The post {field} must be at most {max} characters."
        )));
    }
    Ok(trimmed.to_string())
}

/// Trimmed, de-duplicated tags in their original order. Blank entries are dropped.
pub fn normalize_post_tags(raw: Vec<String>) -> Result<Vec<String>, DomainError> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    if tags.len() > MAX_POST_TAGS {
        return Err(DomainError::ValidationError(format!(
            "A post can carry at most {MAX_POST_TAGS} tags."
        )));
    }
    Ok(tags)
}
