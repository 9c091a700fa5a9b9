//! Post model -> entity

use canvas_core::{Post, Snowflake};

use crate::models::PostModel;

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            title: model.title,
            description: model.description,
            story: model.story,
            photo: model.photo,
            tags: model.tags,
            created_at: model.created_at,
        }
    }
}
