//! Photo post handlers
//!
//! The board is open: anyone may read or post. Posts arrive as
//! `multipart/form-data` with `title`, `description`, `story`, `tags` (a JSON array)
//! and a `photo` file.

use axum::{
    extract::{Multipart, State},
    Json,
};
use canvas_service::dto::{ApiResponse, PostResponse};
use canvas_service::{NewPost, PostService};
use tracing::debug;

use crate::extractors::IdPath;
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/v1/posts", tag = "posts",
    responses((status = 200, description = "Posts, newest first")))]
pub async fn list_posts(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<PostResponse>>>> {
    let posts = PostService::new(state.service_context()).list().await?;
    Ok(Json(ApiResponse::new(posts)))
}

#[utoipa::path(get, path = "/api/v1/posts/{id}", tag = "posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "The post"),
        (status = 404, description = "No such post")
    ))]
pub async fn get_post(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<PostResponse>>> {
    let post = PostService::new(state.service_context()).get(id).await?;
    Ok(Json(ApiResponse::new(post)))
}

#[utoipa::path(post, path = "/api/v1/posts", tag = "posts",
    responses(
        (status = 201, description = "Post published"),
        (status = 400, description = "Missing photo, blank or oversized fields, or bad tags")
    ))]
pub async fn create_post(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Created<Json<ApiResponse<PostResponse>>>> {
    let form = read_form(multipart).await?;
    let post = PostService::new(state.service_context()).create(form).await?;
    Ok(Created(Json(ApiResponse::with_message(
        "Post created successfully!",
        post,
    ))))
}

async fn read_form(mut multipart: Multipart) -> Result<NewPost, ApiError> {
    let mut form = NewPost::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_body(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "photo" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::invalid_body(e.body_text()))?;
            form.photo = Some(bytes.to_vec());
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;
        match name.as_str() {
            "title" => form.title = Some(text),
            "description" => form.description = Some(text),
            "story" => form.story = Some(text),
            "tags" => form.tags = Some(text),
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}
