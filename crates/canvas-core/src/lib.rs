//! # canvas-core
//!
//! Domain layer for the ArchiCanvas marketplace: users and their badges, communities
//! with their membership workflow, community messages, artworks, and photo posts.
//! Nothing in here knows about the database, the filesystem, or HTTP.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

pub use entities::{
    bidding_window_end, normalize_message_content, normalize_post_field, normalize_post_tags,
    ApprovalStatus, Artwork, Community, CommunityAccess, Message, Post, Role, User,
    MAX_BIDDING_DAYS, MAX_POST_DESCRIPTION, MAX_POST_STORY, MAX_POST_TAGS, MAX_POST_TITLE,
    MIN_BIDDING_DAYS,
};
pub use error::DomainError;
pub use traits::{
    ArtistRanking, ArtworkRepository, CommunityRepository, DailyCount, HealthProbe,
    MessageRepository, PostRepository, RepoResult, TagCount, UserRepository,
};
pub use value_objects::{
    BadgeSet, BadgeTier, Snowflake, SnowflakeGenerator, SnowflakeParseError, BADGE_TIERS,
};
