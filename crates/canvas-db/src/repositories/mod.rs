//! PostgreSQL implementations of the `canvas-core` repository traits

mod artwork;
mod community;
mod error;
mod health;
mod message;
mod post;
mod user;

pub use artwork::PgArtworkRepository;
pub use community::PgCommunityRepository;
pub use health::PgHealthProbe;
pub use message::PgMessageRepository;
pub use post::PgPostRepository;
pub use user::PgUserRepository;
