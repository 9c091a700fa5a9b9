//! Community handlers
//!
//! Public listing plus the join / approve / reject / leave workflow.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use canvas_service::dto::{
    ApiResponse, CommunityDetailResponse, CommunityListQuery, CommunityResponse,
    CreateCommunityRequest, MemberActionRequest, MemberSummary, MembershipResponse,
};
use canvas_service::CommunityService;

use super::query;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/v1/communities", tag = "communities",
    params(("search" = Option<String>, Query, description = "Match on name or description")),
    responses((status = 200, description = "Approved communities")))]
pub async fn list_communities(
    State(state): State<AppState>,
    _caller: AuthUser,
    params: Result<Query<CommunityListQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<CommunityResponse>>>> {
    let params = query(params)?;
    let communities = CommunityService::new(state.service_context())
        .list(params.search.as_deref())
        .await?;
    Ok(Json(ApiResponse::new(communities)))
}

#[utoipa::path(post, path = "/api/v1/communities", tag = "communities",
    responses(
        (status = 201, description = "Created, pending admin approval"),
        (status = 409, description = "Name already taken")
    ))]
pub async fn create_community(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCommunityRequest>,
) -> ApiResult<Created<Json<ApiResponse<CommunityResponse>>>> {
    let community = CommunityService::new(state.service_context())
        .create(&user, request)
        .await?;
    Ok(Created(Json(ApiResponse::with_message(
        "Community created successfully! It is pending admin approval.",
        community,
    ))))
}

#[utoipa::path(get, path = "/api/v1/communities/{id}", tag = "communities",
    params(("id" = String, Path, description = "Community id")),
    responses(
        (status = 200, description = "Community with members and the caller's access"),
        (status = 404, description = "Unknown or not approved")
    ))]
pub async fn get_community(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<CommunityDetailResponse>>> {
    let detail = CommunityService::new(state.service_context())
        .detail(id, &user)
        .await?;
    Ok(Json(ApiResponse::new(detail)))
}

#[utoipa::path(post, path = "/api/v1/communities/{id}/request-join", tag = "communities",
    params(("id" = String, Path, description = "Community id")),
    responses((status = 200, description = "Request recorded or already in place")))]
pub async fn request_join(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<MembershipResponse>> {
    let response = CommunityService::new(state.service_context())
        .request_join(id, &user)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/v1/communities/{id}/approve-member", tag = "communities",
    params(("id" = String, Path, description = "Community id")),
    responses(
        (status = 200, description = "Member approved"),
        (status = 403, description = "Caller is not the creator")
    ))]
pub async fn approve_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<MemberActionRequest>,
) -> ApiResult<Json<MembershipResponse>> {
    let response = CommunityService::new(state.service_context())
        .approve_member(id, &user, request)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/v1/communities/{id}/reject-member", tag = "communities",
    params(("id" = String, Path, description = "Community id")),
    responses(
        (status = 200, description = "Request rejected"),
        (status = 403, description = "Caller is not the creator")
    ))]
pub async fn reject_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<MemberActionRequest>,
) -> ApiResult<Json<MembershipResponse>> {
    let response = CommunityService::new(state.service_context())
        .reject_member(id, &user, request)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/v1/communities/{id}/pending-requests", tag = "communities",
    params(("id" = String, Path, description = "Community id")),
    responses((status = 200, description = "Users waiting for approval")))]
pub async fn pending_requests(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<MemberSummary>>>> {
    let pending = CommunityService::new(state.service_context())
        .pending_requests(id, &user)
        .await?;
    Ok(Json(ApiResponse::new(pending)))
}

#[utoipa::path(post, path = "/api/v1/communities/{id}/leave", tag = "communities",
    params(("id" = String, Path, description = "Community id")),
    responses(
        (status = 200, description = "Left the community"),
        (status = 403, description = "Creator, or not a member")
    ))]
pub async fn leave_community(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<MembershipResponse>> {
    let response = CommunityService::new(state.service_context())
        .leave(id, &user)
        .await?;
    Ok(Json(response))
}
