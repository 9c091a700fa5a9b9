//! Admin service
//!
//! Moderation queues for artists and communities plus the dashboard figures.
//! Every entry point re-checks the admin role of the caller.

use canvas_core::{ApprovalStatus, Community, DomainError, Role, Snowflake, User};
use chrono::{Duration, Utc};
use tracing::{info, instrument};

use crate::dto::{
    AnalyticsResponse, CommunityRanking, CommunityResponse, StatsResponse, UserDirectory,
    UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const TOP_COMMUNITIES: i64 = 10;
const TOP_ARTISTS: i64 = 5;
const MESSAGE_WINDOW_DAYS: i64 = 30;

pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn require_admin(caller: &User) -> ServiceResult<()> {
        if caller.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::permission_denied(
                "You do not have permission to perform this action",
            ))
        }
    }

    #[instrument(skip(self, caller))]
    pub async fn stats(&self, caller: &User) -> ServiceResult<StatsResponse> {
        Self::require_admin(caller)?;

        let users = self.ctx.user_repo();
        Ok(StatsResponse {
            total_buyers: users.count_by_role(Role::Buyer).await?,
            total_artists: users.count_by_role(Role::Artist).await?,
            total_artworks: self.ctx.artwork_repo().count().await?,
            total_communities: self
                .ctx
                .community_repo()
                .count_by_status(ApprovalStatus::Approved)
                .await?,
        })
    }

    // === Artists ===

    #[instrument(skip(self, caller))]
    pub async fn pending_artists(&self, caller: &User) -> ServiceResult<Vec<UserResponse>> {
        Self::require_admin(caller)?;
        let artists = self.ctx.user_repo().find_pending_artists().await?;
        Ok(artists.iter().map(UserResponse::from).collect())
    }

    pub async fn approve_artist(&self, caller: &User, artist_id: Snowflake) -> ServiceResult<String> {
        self.decide_artist(caller, artist_id, ApprovalStatus::Approved)
            .await?;
        Ok("Artist approved successfully.".to_string())
    }

    pub async fn reject_artist(&self, caller: &User, artist_id: Snowflake) -> ServiceResult<String> {
        self.decide_artist(caller, artist_id, ApprovalStatus::Rejected)
            .await?;
        Ok("Artist rejected successfully.".to_string())
    }

    #[instrument(skip(self, caller))]
    async fn decide_artist(
        &self,
        caller: &User,
        artist_id: Snowflake,
        status: ApprovalStatus,
    ) -> ServiceResult<User> {
        Self::require_admin(caller)?;
        let artist = self
            .ctx
            .user_repo()
            .set_artist_status(artist_id, status)
            .await?
            .ok_or(DomainError::ArtistNotFound(artist_id))?;
        info!(artist_id = %artist.id, status = %status, "Artist reviewed");
        Ok(artist)
    }

    // === Communities ===

    #[instrument(skip(self, caller))]
    pub async fn pending_communities(&self, caller: &User) -> ServiceResult<Vec<CommunityResponse>> {
        Self::require_admin(caller)?;

        let communities = self
            .ctx
            .community_repo()
            .find_by_status(ApprovalStatus::Pending)
            .await?;
        let mut creator_ids: Vec<Snowflake> = communities.iter().map(|c| c.creator_id).collect();
        creator_ids.sort_unstable();
        creator_ids.dedup();
        let creators = UserDirectory::new(self.ctx.user_repo().find_many(&creator_ids).await?);

        Ok(communities
            .iter()
            .map(|c| CommunityResponse::build(c, &creators))
            .collect())
    }

    pub async fn approve_community(
        &self,
        caller: &User,
        community_id: Snowflake,
    ) -> ServiceResult<String> {
        self.decide_community(caller, community_id, ApprovalStatus::Approved)
            .await?;
        Ok("Community approved successfully.".to_string())
    }

    pub async fn reject_community(
        &self,
        caller: &User,
        community_id: Snowflake,
    ) -> ServiceResult<String> {
        self.decide_community(caller, community_id, ApprovalStatus::Rejected)
            .await?;
        Ok("Community rejected successfully.".to_string())
    }

    #[instrument(skip(self, caller))]
    async fn decide_community(
        &self,
        caller: &User,
        community_id: Snowflake,
        status: ApprovalStatus,
    ) -> ServiceResult<Community> {
        Self::require_admin(caller)?;
        let community = self
            .ctx
            .community_repo()
            .set_status(community_id, status)
            .await?
            .ok_or(DomainError::CommunityNotFound(community_id))?;
        info!(community_id = %community.id, status = %status, "Community reviewed");
        Ok(community)
    }

    // === Dashboard ===

    #[instrument(skip(self, caller))]
    pub async fn analytics(&self, caller: &User) -> ServiceResult<AnalyticsResponse> {
        Self::require_admin(caller)?;

        let since = Utc::now() - Duration::days(MESSAGE_WINDOW_DAYS);
        let top_communities = self
            .ctx
            .community_repo()
            .top_by_member_count(TOP_COMMUNITIES)
            .await?;
        let messages = self.ctx.message_repo().daily_counts_since(since).await?;
        let artists = self.ctx.artwork_repo().top_artists(TOP_ARTISTS).await?;
        let tags = self.ctx.artwork_repo().count_by_tag().await?;

        Ok(AnalyticsResponse {
            top_communities: top_communities.iter().map(CommunityRanking::from).collect(),
            messages_over_time: messages.into_iter().map(Into::into).collect(),
            top_artists: artists.into_iter().map(Into::into).collect(),
            artwork_by_category: tags.into_iter().map(Into::into).collect(),
        })
    }
}
