//! Business logic services

pub mod admin;
pub mod artwork;
pub mod auth;
pub mod community;
pub mod context;
pub mod error;
pub mod message;
pub mod post;
pub mod user;

pub use admin::AdminService;
pub use artwork::{ArtworkService, NewArtwork};
pub use auth::AuthService;
pub use community::CommunityService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use message::MessageService;
pub use post::{NewPost, PostService};
pub use user::UserService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;
    use std::sync::Arc;

    use canvas_common::{hash_password, JwtService};
    use canvas_core::{ApprovalStatus, Artwork, Role, Snowflake, SnowflakeGenerator, User};
    use canvas_db::InMemoryStore;
    use canvas_media::ArtworkStore;
    use chrono::Utc;
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::{CommunityService, ServiceContext};
    use crate::dto::MemberActionRequest;

    pub const PASSWORD: &str = "correct-horse";

    /// Context over a fresh in-memory store, with assets under a temp dir
    pub fn context() -> (ServiceContext, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtworkStore::new(
            dir.path().join("uploads"),
            dir.path().join("artworks"),
            "/artworks",
        );
        let ctx = ServiceContext::builder()
            .store(InMemoryStore::shared())
            .jwt_service(Arc::new(JwtService::new("test-secret", 3600)))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .artwork_store(Arc::new(store))
            .build()
            .unwrap();
        (ctx, dir)
    }

    /// An approved account whose password is [`PASSWORD`]
    pub async fn register(ctx: &ServiceContext, email: &str, role: Role) -> User {
        let name = email.split('@').next().unwrap_or(email).to_string();
        let specialization = (role == Role::Artist).then(|| "Oils".to_string());
        let mut user = User::new(ctx.generate_id(), name, email.to_string(), role, specialization);
        user.status = ApprovalStatus::Approved;

        let hash = hash_password(PASSWORD).unwrap();
        ctx.user_repo().create(&user, &hash).await.unwrap();
        user
    }

    pub async fn approved_community(ctx: &ServiceContext, creator: &User, name: &str) -> Snowflake {
        let created = CommunityService::new(ctx)
            .create(
                creator,
                crate::dto::CreateCommunityRequest {
                    name: name.to_string(),
                    description: format!("All about {name}"),
                },
            )
            .await
            .unwrap();
        ctx.community_repo()
            .set_status(created.id, ApprovalStatus::Approved)
            .await
            .unwrap()
            .unwrap();
        created.id
    }

    /// Request to join and have the creator approve it
    pub async fn join(ctx: &ServiceContext, community: Snowflake, creator: &User, member: &User) {
        let service = CommunityService::new(ctx);
        service.request_join(community, member).await.unwrap();
        service
            .approve_member(
                community,
                creator,
                MemberActionRequest {
                    member_id: Some(member.id),
                },
            )
            .await
            .unwrap();
    }

    /// Store an artwork row without going through the upload pipeline
    pub async fn seed_artwork(ctx: &ServiceContext, owner_id: Snowflake, tags: &[&str]) -> Artwork {
        let artwork = Artwork {
            id: ctx.generate_id(),
            owner_id,
            title: "Untitled".to_string(),
            description: "Study".to_string(),
            photo: "/artworks/seed.png".to_string(),
            price: 10.0,
            is_biddable: false,
            bidding_end_time: None,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            current_bid: 0.0,
            created_at: Utc::now(),
        };
        ctx.artwork_repo().create(&artwork).await.unwrap();
        artwork
    }

    pub fn png_bytes() -> Vec<u8> {
        let image = RgbaImage::from_pixel(96, 64, Rgba([240, 240, 240, 255]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }
}
