//! Post service
//!
//! Photo stories on the public board. Photos are published as uploaded, without a
//! watermark.

use canvas_core::{
    normalize_post_field, normalize_post_tags, DomainError, Post, Snowflake,
    MAX_POST_DESCRIPTION, MAX_POST_STORY, MAX_POST_TITLE,
};
use chrono::Utc;
use tracing::{info, instrument};

use crate::dto::PostResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const PHOTO_PREFIX: &str = "post";

/// Raw fields of the post form
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub description: Option<String>,
    pub story: Option<String>,
    /// JSON array of strings
    pub tags: Option<String>,
    pub photo: Option<Vec<u8>>,
}

struct PostDraft {
    title: String,
    description: String,
    story: String,
    tags: Vec<String>,
    photo: Vec<u8>,
}

impl NewPost {
    fn validate(self) -> ServiceResult<PostDraft> {
        let photo = self
            .photo
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| ServiceError::validation("Photo is required."))?;

        let title = field(self.title, "title", MAX_POST_TITLE)?;
        let description = field(self.description, "description", MAX_POST_DESCRIPTION)?;
        let story = field(self.story, "story", MAX_POST_STORY)?;

        let raw_tags = match self.tags.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(raw) => serde_json::from_str::<Vec<String>>(raw)
                .map_err(|_| ServiceError::validation("Tags must be a JSON array of strings."))?,
        };
        let tags = normalize_post_tags(raw_tags).map_err(validation_message)?;

        Ok(PostDraft {
            title,
            description,
            story,
            tags,
            photo,
        })
    }
}

fn field(value: Option<String>, name: &str, max: usize) -> ServiceResult<String> {
    normalize_post_field(name, value.as_deref().unwrap_or_default(), max)
        .map_err(validation_message)
}

/// Surface a domain validation failure with its bare message
fn validation_message(err: DomainError) -> ServiceError {
    match err {
        DomainError::ValidationError(msg) => ServiceError::Validation(msg),
        other => other.into(),
    }
}

pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, form))]
    pub async fn create(&self, form: NewPost) -> ServiceResult<PostResponse> {
        let draft = form.validate()?;

        let store = self.ctx.artwork_store();
        let image = store.save_original(PHOTO_PREFIX, &draft.photo).await?;

        let post = Post {
            id: self.ctx.generate_id(),
            title: draft.title,
            description: draft.description,
            story: draft.story,
            photo: image.public_path,
            tags: draft.tags,
            created_at: Utc::now(),
        };
        if let Err(e) = self.ctx.post_repo().create(&post).await {
            store.discard(&image.file_path).await;
            return Err(e.into());
        }

        info!(post_id = %post.id, tags = post.tags.len(), "Post created");
        Ok(PostResponse::from(&post))
    }

    /// Newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<PostResponse>> {
        let posts = self.ctx.post_repo().list_newest().await?;
        Ok(posts.iter().map(PostResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, post_id: Snowflake) -> ServiceResult<PostResponse> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .map(|post| PostResponse::from(&post))
            .ok_or_else(|| DomainError::PostNotFound(post_id).into())
    }
}
