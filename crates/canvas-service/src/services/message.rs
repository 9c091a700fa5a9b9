//! Message service
//!
//! The feed is polled. `after` limits a poll to messages newer than the last one the
//! client saw.

use canvas_core::{normalize_message_content, DomainError, Message, Snowflake, User};
use tracing::{info, instrument};

use crate::dto::{MessageResponse, PostMessageRequest, UserDirectory};

use super::community::CommunityService;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Members and the creator may post. Content is trimmed and must not be blank.
    #[instrument(skip(self, author, request), fields(author_id = %author.id))]
    pub async fn post(
        &self,
        community_id: Snowflake,
        author: &User,
        request: PostMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        self.require_feed_access(community_id, author).await?;
        let content = normalize_message_content(&request.content)?;

        let message = Message::new(self.ctx.generate_id(), community_id, author.id, content);
        self.ctx.message_repo().create(&message).await?;

        info!(community_id = %community_id, message_id = %message.id, "Message posted");
        Ok(MessageResponse::build(
            &message,
            &UserDirectory::new(vec![author.clone()]),
        ))
    }

    /// Oldest first
    #[instrument(skip(self, viewer), fields(viewer_id = %viewer.id))]
    pub async fn list(
        &self,
        community_id: Snowflake,
        viewer: &User,
        after: Option<Snowflake>,
    ) -> ServiceResult<Vec<MessageResponse>> {
        self.require_feed_access(community_id, viewer).await?;

        let messages = self
            .ctx
            .message_repo()
            .find_by_community(community_id, after)
            .await?;

        let mut author_ids: Vec<Snowflake> = messages.iter().map(|m| m.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors = UserDirectory::new(self.ctx.user_repo().find_many(&author_ids).await?);

        Ok(messages
            .iter()
            .map(|m| MessageResponse::build(m, &authors))
            .collect())
    }

    async fn require_feed_access(&self, community_id: Snowflake, user: &User) -> ServiceResult<()> {
        let community = CommunityService::new(self.ctx).existing(community_id).await?;
        if !community.access_for(user.id).can_use_feed() {
            return Err(DomainError::NotCommunityMember.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{approved_community, context, join, register};
    use canvas_core::Role;

    fn say(content: &str) -> PostMessageRequest {
        PostMessageRequest {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_member_posts_and_reads() {
        let (ctx, _dir) = context();
        let a = register(&ctx, "a@example.com", Role::Buyer).await;
        let b = register(&ctx, "b@example.com", Role::Buyer).await;
        let community = approved_community(&ctx, &a, "Sketchers").await;
        join(&ctx, community, &a, &b).await;
        let service = MessageService::new(&ctx);

        let first = service.post(community, &a, say("  hello  ")).await.unwrap();
        assert_eq!(first.content, "hello");
        service.post(community, &b, say("hi there")).await.unwrap();

        let feed = service.list(community, &b, None).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].author.name, a.name);
        assert_eq!(feed[1].author.name, b.name);

        let newer = service.list(community, &a, Some(first.id)).await.unwrap();
        assert_eq!(newer.len(), 1);
        assert_eq!(newer[0].content, "hi there");
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let (ctx, _dir) = context();
        let a = register(&ctx, "a@example.com", Role::Buyer).await;
        let community = approved_community(&ctx, &a, "Sketchers").await;

        let err = MessageService::new(&ctx)
            .post(community, &a, say("   \n "))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_outsiders_cannot_use_feed() {
        let (ctx, _dir) = context();
        let a = register(&ctx, "a@example.com", Role::Buyer).await;
        let c = register(&ctx, "c@example.com", Role::Buyer).await;
        let community = approved_community(&ctx, &a, "Sketchers").await;
        let service = MessageService::new(&ctx);

        assert_eq!(service.post(community, &c, say("hey")).await.unwrap_err().status_code(), 403);
        assert_eq!(service.list(community, &c, None).await.unwrap_err().status_code(), 403);

        // Still pending
        CommunityService::new(&ctx).request_join(community, &c).await.unwrap();
        assert_eq!(service.post(community, &c, say("hey")).await.unwrap_err().status_code(), 403);

        let missing = service.list(Snowflake::new(1), &a, None).await.unwrap_err();
        assert_eq!(missing.status_code(), 404);
    }
}
