//! SQLx row models

mod analytics;
mod artwork;
mod community;
mod message;
mod post;
mod user;

pub use analytics::{ArtistRankingModel, DailyCountModel, TagCountModel};
pub use artwork::ArtworkModel;
pub use community::CommunityModel;
pub use message::MessageModel;
pub use post::PostModel;
pub use user::UserModel;
