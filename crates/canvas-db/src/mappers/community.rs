//! Community model -> entity

use canvas_core::{Community, DomainError, Snowflake};

use crate::models::CommunityModel;

impl TryFrom<CommunityModel> for Community {
    type Error = DomainError;

    fn try_from(model: CommunityModel) -> Result<Self, Self::Error> {
        Ok(Community {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            creator_id: Snowflake::new(model.creator_id),
            members: model.members.into_iter().map(Snowflake::new).collect(),
            pending_members: model.pending_members.into_iter().map(Snowflake::new).collect(),
            member_count: model.member_count,
            status: model.status.parse().map_err(DomainError::DatabaseError)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE
pub(crate) fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
