//! Domain entities

mod artwork;
mod community;
mod message;
mod post;
mod status;
mod user;

pub use artwork::{bidding_window_end, Artwork, MAX_BIDDING_DAYS, MIN_BIDDING_DAYS};
pub use community::{Community, CommunityAccess};
pub use message::{normalize_message_content, Message};
pub use post::{
    normalize_post_field, normalize_post_tags, Post, MAX_POST_DESCRIPTION, MAX_POST_STORY,
    MAX_POST_TAGS, MAX_POST_TITLE,
};
pub use status::ApprovalStatus;
pub use user::{Role, User};
