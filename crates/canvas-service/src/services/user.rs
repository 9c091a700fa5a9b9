//! Profile and badge queries for the signed-in user

use canvas_core::{BadgeSet, User};
use tracing::instrument;

use crate::dto::{badge_responses, BadgesResponse, UserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn me(&self, user: &User) -> UserResponse {
        UserResponse::from(user)
    }

    /// Badges derived from the number of artworks the user actually owns
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn my_badges(&self, user: &User) -> ServiceResult<BadgesResponse> {
        let artwork_count = self.ctx.artwork_repo().count_by_owner(user.id).await?;
        let earned = BadgeSet::earned_for(i32::try_from(artwork_count).unwrap_or(i32::MAX));

        Ok(BadgesResponse {
            artwork_count,
            badges: badge_responses(earned),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{context, register, seed_artwork};
    use canvas_core::Role;

    #[tokio::test]
    async fn test_badges_follow_owned_artworks() {
        let (ctx, _dir) = context();
        let artist = register(&ctx, "artist@example.com", Role::Artist).await;
        let users = UserService::new(&ctx);

        let none = users.my_badges(&artist).await.unwrap();
        assert_eq!(none.artwork_count, 0);
        assert!(none.badges.is_empty());

        for _ in 0..5 {
            seed_artwork(&ctx, artist.id, &[]).await;
        }
        let five = users.my_badges(&artist).await.unwrap();
        assert_eq!(five.artwork_count, 5);
        let names: Vec<_> = five.badges.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Novice Artist", "Rising Star"]);
        assert_eq!(five.badges[1].earned_at, "5 Artworks");
    }
}
