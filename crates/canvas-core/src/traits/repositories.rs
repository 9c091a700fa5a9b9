//! Repository traits (ports)
//!
//! The domain states what it needs from storage; `canvas-db` provides a PostgreSQL
//! implementation and an in-memory one. Membership transitions are single calls so
//! each backend can apply them atomically.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::entities::{ApprovalStatus, Artwork, Community, Message, Post, Role, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by (lowercase) email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Load several users at once; unknown ids are skipped
    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Replace the password hash and stamp when it changed
    async fn update_password(
        &self,
        id: Snowflake,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Artists still waiting for approval, oldest first
    async fn find_pending_artists(&self) -> RepoResult<Vec<User>>;

    /// Set an artist's approval status. `None` when no artist has this id.
    async fn set_artist_status(
        &self,
        id: Snowflake,
        status: ApprovalStatus,
    ) -> RepoResult<Option<User>>;

    /// Atomically count one more artwork for the user and union in earned badges
    async fn record_artwork(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Number of accounts with the given role
    async fn count_by_role(&self, role: Role) -> RepoResult<i64>;
}

// ============================================================================
// Community Repository
// ============================================================================

#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Find community by ID regardless of status
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Community>>;

    /// Create a new community (fails with `CommunityNameTaken` on duplicates)
    async fn create(&self, community: &Community) -> RepoResult<()>;

    /// Approved communities in creation order, optionally filtered by a
    /// case-insensitive substring of name or description
    async fn list_approved(&self, search: Option<&str>) -> RepoResult<Vec<Community>>;

    /// Communities in a given status, in creation order
    async fn find_by_status(&self, status: ApprovalStatus) -> RepoResult<Vec<Community>>;

    /// Set the admin approval status
    async fn set_status(
        &self,
        id: Snowflake,
        status: ApprovalStatus,
    ) -> RepoResult<Option<Community>>;

    /// Queue a join request (no-op for pending users and members)
    async fn add_pending(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Community>>;

    /// Pull from pending, add to members, and increment the member counter
    async fn approve_member(
        &self,
        id: Snowflake,
        member_id: Snowflake,
    ) -> RepoResult<Option<Community>>;

    /// Pull from pending
    async fn reject_member(
        &self,
        id: Snowflake,
        member_id: Snowflake,
    ) -> RepoResult<Option<Community>>;

    /// Pull from members and decrement the member counter
    async fn remove_member(
        &self,
        id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Community>>;

    /// Number of communities in a given status
    async fn count_by_status(&self, status: ApprovalStatus) -> RepoResult<i64>;

    /// Approved communities with the highest member counters
    async fn top_by_member_count(&self, limit: i64) -> RepoResult<Vec<Community>>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Messages posted on one UTC day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Create a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Messages of a community, oldest first; with `after`, only newer ids
    async fn find_by_community(
        &self,
        community_id: Snowflake,
        after: Option<Snowflake>,
    ) -> RepoResult<Vec<Message>>;

    /// Messages per UTC day since `since`, ascending by date
    async fn daily_counts_since(&self, since: DateTime<Utc>) -> RepoResult<Vec<DailyCount>>;
}

// ============================================================================
// Artwork Repository
// ============================================================================

/// Artist ranked by number of listed artworks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistRanking {
    pub name: String,
    pub artwork_count: i64,
}

/// Number of artworks carrying a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub value: i64,
}

#[async_trait]
pub trait ArtworkRepository: Send + Sync {
    /// Create a new artwork
    async fn create(&self, artwork: &Artwork) -> RepoResult<()>;

    /// Find artwork by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Artwork>>;

    /// All artworks, newest first
    async fn list_newest(&self) -> RepoResult<Vec<Artwork>>;

    /// Total number of artworks
    async fn count(&self) -> RepoResult<i64>;

    /// Number of artworks owned by a user
    async fn count_by_owner(&self, owner_id: Snowflake) -> RepoResult<i64>;

    /// Artists with the most artworks
    async fn top_artists(&self, limit: i64) -> RepoResult<Vec<ArtistRanking>>;

    /// Artwork counts per tag, most used first
    async fn count_by_tag(&self) -> RepoResult<Vec<TagCount>>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    /// All posts, newest first
    async fn list_newest(&self) -> RepoResult<Vec<Post>>;
}

// ============================================================================
// Health
// ============================================================================

#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Round-trip to the backing store
    async fn ping(&self) -> RepoResult<()>;
}
