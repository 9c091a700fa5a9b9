//! Community message feed

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use canvas_service::dto::{ApiResponse, MessageResponse, MessagesQuery, PostMessageRequest};
use canvas_service::MessageService;

use super::query;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Oldest first. Pass `after` with the last id seen to poll for new messages only.
#[utoipa::path(get, path = "/api/v1/communities/{id}/messages", tag = "messages",
    params(
        ("id" = String, Path, description = "Community id"),
        ("after" = Option<String>, Query, description = "Only messages after this id")
    ),
    responses(
        (status = 200, description = "Messages in creation order"),
        (status = 403, description = "Caller is not a member")
    ))]
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    params: Result<Query<MessagesQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<MessageResponse>>>> {
    let params = query(params)?;
    let messages = MessageService::new(state.service_context())
        .list(id, &user, params.after)
        .await?;
    Ok(Json(ApiResponse::new(messages)))
}

#[utoipa::path(post, path = "/api/v1/communities/{id}/messages", tag = "messages",
    params(("id" = String, Path, description = "Community id")),
    responses(
        (status = 201, description = "Message posted"),
        (status = 400, description = "Blank content"),
        (status = 403, description = "Caller is not a member")
    ))]
pub async fn post_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<PostMessageRequest>,
) -> ApiResult<Created<Json<ApiResponse<MessageResponse>>>> {
    let message = MessageService::new(state.service_context())
        .post(id, &user, request)
        .await?;
    Ok(Created(Json(ApiResponse::new(message))))
}
