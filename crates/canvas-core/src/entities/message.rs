//! Message entity - one post in a community feed

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Immutable once stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub community_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(id: Snowflake, community_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        Self {
            id,
            community_id,
            author_id,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Trim message text, rejecting anything that is blank afterwards
pub fn normalize_message_content(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyMessage);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_is_trimmed() {
        assert_eq!(normalize_message_content("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn test_blank_content_is_rejected() {
        assert!(matches!(
            normalize_message_content(" \n\t "),
            Err(DomainError::EmptyMessage)
        ));
        assert!(normalize_message_content("").is_err());
    }
}
