//! User model -> entity

use canvas_core::{BadgeSet, DomainError, Snowflake, User};

use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: Snowflake::new(model.id),
            name: model.name,
            email: model.email,
            role: model.role.parse().map_err(DomainError::DatabaseError)?,
            specialization: model.specialization,
            bio: model.bio,
            status: model.status.parse().map_err(DomainError::DatabaseError)?,
            artwork_count: model.artwork_count,
            badges: BadgeSet::from_names(&model.badges),
            password_changed_at: model.password_changed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::{ApprovalStatus, Role};
    use chrono::Utc;

    fn model(role: &str) -> UserModel {
        UserModel {
            id: 7,
            name: "Mira".to_string(),
            email: "mira@example.com".to_string(),
            role: role.to_string(),
            specialization: Some("Ink".to_string()),
            bio: None,
            status: "approved".to_string(),
            artwork_count: 5,
            badges: vec!["Novice Artist".to_string(), "Rising Star".to_string()],
            password_changed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_maps_row() {
        let user = User::try_from(model("artist")).unwrap();
        assert_eq!(user.role, Role::Artist);
        assert_eq!(user.status, ApprovalStatus::Approved);
        assert_eq!(user.badges, BadgeSet::NOVICE_ARTIST | BadgeSet::RISING_STAR);
    }

    #[test]
    fn test_unknown_role_is_an_error() {
        assert!(matches!(
            User::try_from(model("curator")),
            Err(DomainError::DatabaseError(_))
        ));
    }
}
