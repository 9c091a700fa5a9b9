//! Value objects - small immutable types shared by the entities

mod badges;
mod snowflake;

pub use badges::{BadgeSet, BadgeTier, BADGE_TIERS};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
