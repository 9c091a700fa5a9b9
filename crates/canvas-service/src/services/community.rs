//! Community service
//!
//! Creation, public listing, and the join / approve / reject / leave workflow.
//! Who may do what is decided by [`CommunityAccess`] for the caller.

use canvas_core::{
    Community, CommunityAccess, CommunityRepository, DomainError, Snowflake, User,
};
use tracing::{debug, info, instrument};

use crate::dto::{
    CommunityDetailResponse, CommunityResponse, CreateCommunityRequest, MemberActionRequest,
    MemberSummary, MembershipResponse, UserDirectory,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct CommunityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommunityService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn repo(&self) -> &dyn CommunityRepository {
        self.ctx.community_repo()
    }

    /// New communities start pending with the creator as their only member
    #[instrument(skip(self, creator, request), fields(creator_id = %creator.id))]
    pub async fn create(
        &self,
        creator: &User,
        request: CreateCommunityRequest,
    ) -> ServiceResult<CommunityResponse> {
        let name = request.name.trim();
        let description = request.description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(ServiceError::validation("Please provide a name and description."));
        }

        let community = Community::new(
            self.ctx.generate_id(),
            name.to_string(),
            description.to_string(),
            creator.id,
        );
        self.repo().create(&community).await?;

        info!(community_id = %community.id, "Community created, awaiting approval");
        Ok(CommunityResponse::build(
            &community,
            &UserDirectory::new(vec![creator.clone()]),
        ))
    }

    /// Approved communities, optionally filtered by name or description
    #[instrument(skip(self))]
    pub async fn list(&self, search: Option<&str>) -> ServiceResult<Vec<CommunityResponse>> {
        let communities = self.repo().list_approved(search).await?;
        let creators = self.creators_of(&communities).await?;
        Ok(communities
            .iter()
            .map(|c| CommunityResponse::build(c, &creators))
            .collect())
    }

    /// Details of an approved community. Pending and rejected ones are not found,
    /// even for their creator.
    #[instrument(skip(self, viewer), fields(viewer_id = %viewer.id))]
    pub async fn detail(
        &self,
        community_id: Snowflake,
        viewer: &User,
    ) -> ServiceResult<CommunityDetailResponse> {
        let community = self.visible(community_id).await?;
        let access = community.access_for(viewer.id);

        let mut ids = community.members.clone();
        ids.push(community.creator_id);
        if access.can_moderate() {
            ids.extend(community.pending_members.iter().copied());
        }
        let users = UserDirectory::new(self.ctx.user_repo().find_many(&ids).await?);

        Ok(CommunityDetailResponse {
            community: CommunityResponse::build(&community, &users),
            members: users.members(&community.members),
            access: access.as_str(),
            pending_members: access
                .can_moderate()
                .then(|| users.members(&community.pending_members)),
        })
    }

    /// Ask to join. Repeating the request, or asking as a member, changes nothing.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn request_join(
        &self,
        community_id: Snowflake,
        user: &User,
    ) -> ServiceResult<MembershipResponse> {
        let community = self.visible(community_id).await?;
        let access = community.access_for(user.id);

        let message = match access {
            CommunityAccess::NonMember => {
                "Your request to join has been sent to the owner for approval."
            }
            CommunityAccess::Pending => "Your request to join is already pending.",
            CommunityAccess::Member | CommunityAccess::Creator => {
                "You are already a member of this community."
            }
        };

        let community = if access.join_request_applies() {
            let updated = self
                .repo()
                .add_pending(community_id, user.id)
                .await?
                .ok_or(DomainError::CommunityNotFound(community_id))?;
            info!(community_id = %community_id, "Join request queued");
            updated
        } else {
            debug!(access = access.as_str(), "Join request ignored");
            community
        };

        Ok(membership(&community, message, false))
    }

    /// Creator only. Moves the user into the member list and bumps the counter.
    #[instrument(skip(self, requester, request), fields(requester_id = %requester.id))]
    pub async fn approve_member(
        &self,
        community_id: Snowflake,
        requester: &User,
        request: MemberActionRequest,
    ) -> ServiceResult<MembershipResponse> {
        let member_id = request
            .member_id
            .ok_or_else(|| ServiceError::validation("Please provide the member ID to approve."))?;

        self.moderated(community_id, requester).await?;

        if self.ctx.user_repo().find_by_id(member_id).await?.is_none() {
            return Err(DomainError::UserNotFound(member_id).into());
        }

        let community = self
            .repo()
            .approve_member(community_id, member_id)
            .await?
            .ok_or(DomainError::CommunityNotFound(community_id))?;

        info!(
            community_id = %community_id,
            member_id = %member_id,
            member_count = community.member_count,
            "Member approved"
        );
        Ok(membership(&community, "Member has been approved.", true))
    }

    /// Creator only. Drops a pending request.
    #[instrument(skip(self, requester, request), fields(requester_id = %requester.id))]
    pub async fn reject_member(
        &self,
        community_id: Snowflake,
        requester: &User,
        request: MemberActionRequest,
    ) -> ServiceResult<MembershipResponse> {
        let member_id = request
            .member_id
            .ok_or_else(|| ServiceError::validation("Please provide the member ID to reject."))?;

        self.moderated(community_id, requester).await?;

        let community = self
            .repo()
            .reject_member(community_id, member_id)
            .await?
            .ok_or(DomainError::CommunityNotFound(community_id))?;

        info!(community_id = %community_id, member_id = %member_id, "Member rejected");
        Ok(membership(&community, "Member has been rejected.", true))
    }

    /// Creator only
    #[instrument(skip(self, requester), fields(requester_id = %requester.id))]
    pub async fn pending_requests(
        &self,
        community_id: Snowflake,
        requester: &User,
    ) -> ServiceResult<Vec<MemberSummary>> {
        let community = self.moderated(community_id, requester).await?;
        let users = UserDirectory::new(
            self.ctx
                .user_repo()
                .find_many(&community.pending_members)
                .await?,
        );
        Ok(users.members(&community.pending_members))
    }

    /// Members other than the creator may leave
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn leave(
        &self,
        community_id: Snowflake,
        user: &User,
    ) -> ServiceResult<MembershipResponse> {
        let community = self.existing(community_id).await?;

        let access = community.access_for(user.id);
        if !access.can_leave() {
            return Err(match access {
                CommunityAccess::Creator => DomainError::CreatorCannotLeave,
                _ => DomainError::NotMemberToLeave,
            }
            .into());
        }

        let community = self
            .repo()
            .remove_member(community_id, user.id)
            .await?
            .ok_or(DomainError::CommunityNotFound(community_id))?;

        info!(community_id = %community_id, "Member left");
        Ok(membership(&community, "You have left the community.", false))
    }

    // === Lookups ===

    pub(crate) async fn existing(&self, community_id: Snowflake) -> ServiceResult<Community> {
        self.repo()
            .find_by_id(community_id)
            .await?
            .ok_or_else(|| DomainError::CommunityNotFound(community_id).into())
    }

    /// Approved community or not found
    async fn visible(&self, community_id: Snowflake) -> ServiceResult<Community> {
        self.repo()
            .find_by_id(community_id)
            .await?
            .filter(Community::is_visible)
            .ok_or_else(|| DomainError::CommunityNotFound(community_id).into())
    }

    /// Community the requester is allowed to moderate
    async fn moderated(&self, community_id: Snowflake, requester: &User) -> ServiceResult<Community> {
        let community = self.existing(community_id).await?;
        if !community.access_for(requester.id).can_moderate() {
            return Err(DomainError::NotCommunityCreator.into());
        }
        Ok(community)
    }

    async fn creators_of(&self, communities: &[Community]) -> ServiceResult<UserDirectory> {
        let mut ids: Vec<Snowflake> = communities.iter().map(|c| c.creator_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(UserDirectory::new(self.ctx.user_repo().find_many(&ids).await?))
    }
}

fn membership(community: &Community, message: &str, with_lists: bool) -> MembershipResponse {
    MembershipResponse {
        status: "success",
        message: message.to_string(),
        community_id: community.id,
        member_count: community.member_count,
        members: with_lists.then(|| community.members.clone()),
        pending_members: with_lists.then(|| community.pending_members.clone()),
    }
}
