//! Entity to DTO mappers
//!
//! References to other users are resolved by the services and handed in through a
//! [`UserDirectory`]; ids with no matching account render as "Unknown user".

use std::collections::HashMap;

use canvas_core::{
    ArtistRanking, Artwork, BadgeSet, Community, DailyCount, Message, Post, Snowflake, TagCount,
    User,
};

use super::responses::{
    ArtistRankingResponse, ArtworkResponse, BadgeResponse, CommunityRanking, CommunityResponse,
    DailyMessages, MemberSummary, MessageResponse, PostResponse, TagShare, UserResponse,
    UserSummary,
};

const UNKNOWN_USER: &str = "Unknown user";

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            specialization: user.specialization.clone(),
            bio: user.bio.clone(),
            status: user.status,
            artwork_count: user.artwork_count,
            badges: user.badges.names(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

impl From<&User> for MemberSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Badge list for a count of artworks, lowest tier first
pub fn badge_responses(badges: BadgeSet) -> Vec<BadgeResponse> {
    badges
        .tiers()
        .map(|tier| BadgeResponse {
            name: tier.name.to_string(),
            earned_at: format!("{} Artworks", tier.threshold),
            color: tier.color.to_string(),
        })
        .collect()
}

/// Users loaded for one response, keyed by id
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: HashMap<Snowflake, User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    pub fn get(&self, id: Snowflake) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn summary(&self, id: Snowflake) -> UserSummary {
        self.get(id).map_or_else(
            || UserSummary {
                id,
                name: UNKNOWN_USER.to_string(),
            },
            UserSummary::from,
        )
    }

    /// Member summaries in the order of `ids`, skipping deleted accounts
    pub fn members(&self, ids: &[Snowflake]) -> Vec<MemberSummary> {
        ids.iter()
            .filter_map(|id| self.get(*id))
            .map(MemberSummary::from)
            .collect()
    }
}

// ============================================================================
// Community Mappers
// ============================================================================

impl CommunityResponse {
    pub fn build(community: &Community, users: &UserDirectory) -> Self {
        Self {
            id: community.id,
            name: community.name.clone(),
            description: community.description.clone(),
            creator: users.summary(community.creator_id),
            member_count: community.member_count,
            status: community.status,
            created_at: community.created_at,
        }
    }
}

impl From<&Community> for CommunityRanking {
    fn from(community: &Community) -> Self {
        Self {
            id: community.id,
            name: community.name.clone(),
            member_count: community.member_count,
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

impl MessageResponse {
    pub fn build(message: &Message, users: &UserDirectory) -> Self {
        Self {
            id: message.id,
            community_id: message.community_id,
            author: users.summary(message.author_id),
            content: message.content.clone(),
            created_at: message.created_at,
        }
    }
}

// ============================================================================
// Artwork Mappers
// ============================================================================

impl ArtworkResponse {
    pub fn build(artwork: &Artwork, users: &UserDirectory) -> Self {
        Self {
            id: artwork.id,
            title: artwork.title.clone(),
            description: artwork.description.clone(),
            photo: artwork.photo.clone(),
            price: artwork.price,
            is_biddable: artwork.is_biddable,
            bidding_end_time: artwork.bidding_end_time,
            tags: artwork.tags.clone(),
            current_bid: artwork.current_bid,
            artist: users.summary(artwork.owner_id),
            created_at: artwork.created_at,
        }
    }
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            description: post.description.clone(),
            story: post.story.clone(),
            photo_url: post.photo.clone(),
            tags: post.tags.clone(),
            created_at: post.created_at,
        }
    }
}

// ============================================================================
// Analytics Mappers
// ============================================================================

impl From<DailyCount> for DailyMessages {
    fn from(day: DailyCount) -> Self {
        Self {
            date: day.date,
            count: day.count,
        }
    }
}

impl From<ArtistRanking> for ArtistRankingResponse {
    fn from(ranking: ArtistRanking) -> Self {
        Self {
            name: ranking.name,
            artwork_count: ranking.artwork_count,
        }
    }
}

impl From<TagCount> for TagShare {
    fn from(tag: TagCount) -> Self {
        Self {
            name: tag.name,
            value: tag.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::Role;

    #[test]
    fn test_badge_responses() {
        let badges = badge_responses(BadgeSet::earned_for(5));
        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].name, "Novice Artist");
        assert_eq!(badges[0].earned_at, "3 Artworks");
        assert_eq!(badges[1].color, "blue-400");
    }

    #[test]
    fn test_directory_falls_back_for_unknown_users() {
        let ada = User::new(
            Snowflake::new(1),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            Role::Buyer,
            None,
        );
        let users = UserDirectory::new(vec![ada]);

        assert_eq!(users.summary(Snowflake::new(1)).name, "Ada");
        assert_eq!(users.summary(Snowflake::new(2)).name, UNKNOWN_USER);

        let members = users.members(&[Snowflake::new(2), Snowflake::new(1)]);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].email, "ada@example.com");
    }
}
