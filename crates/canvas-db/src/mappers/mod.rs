//! Row model -> domain entity conversions
//!
//! Role and status columns are free text in SQL, so user and community rows map
//! through `TryFrom` and surface unknown values as database errors.

mod analytics;
mod artwork;
mod community;
mod message;
mod post;
mod user;

pub(crate) use community::escape_like;
