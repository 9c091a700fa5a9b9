//! Admin dashboard handlers

use axum::{extract::State, Json};
use canvas_service::dto::{
    AnalyticsResponse, ApiResponse, CommunityResponse, MessageOnlyResponse, StatsResponse,
    UserResponse,
};
use canvas_service::AdminService;

use crate::extractors::{AdminUser, IdPath};
use crate::response::ApiResult;
use crate::state::AppState;

#[utoipa::path(get, path = "/api/v1/admin/stats", tag = "admin",
    responses(
        (status = 200, description = "Headline counts"),
        (status = 403, description = "Caller is not an admin")
    ))]
pub async fn stats(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<Json<ApiResponse<StatsResponse>>> {
    let stats = AdminService::new(state.service_context()).stats(&admin).await?;
    Ok(Json(ApiResponse::new(stats)))
}

#[utoipa::path(get, path = "/api/v1/admin/artists/pending", tag = "admin",
    responses((status = 200, description = "Artists awaiting approval")))]
pub async fn pending_artists(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let artists = AdminService::new(state.service_context())
        .pending_artists(&admin)
        .await?;
    Ok(Json(ApiResponse::new(artists)))
}

#[utoipa::path(patch, path = "/api/v1/admin/artists/{id}/approve", tag = "admin",
    params(("id" = String, Path, description = "Artist id")),
    responses((status = 200, description = "Approved"), (status = 404, description = "No such artist")))]
pub async fn approve_artist(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageOnlyResponse>> {
    let message = AdminService::new(state.service_context())
        .approve_artist(&admin, id)
        .await?;
    Ok(Json(MessageOnlyResponse::new(message)))
}

#[utoipa::path(patch, path = "/api/v1/admin/artists/{id}/reject", tag = "admin",
    params(("id" = String, Path, description = "Artist id")),
    responses((status = 200, description = "Rejected"), (status = 404, description = "No such artist")))]
pub async fn reject_artist(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageOnlyResponse>> {
    let message = AdminService::new(state.service_context())
        .reject_artist(&admin, id)
        .await?;
    Ok(Json(MessageOnlyResponse::new(message)))
}

#[utoipa::path(get, path = "/api/v1/admin/communities/pending", tag = "admin",
    responses((status = 200, description = "Communities awaiting approval")))]
pub async fn pending_communities(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<Json<ApiResponse<Vec<CommunityResponse>>>> {
    let communities = AdminService::new(state.service_context())
        .pending_communities(&admin)
        .await?;
    Ok(Json(ApiResponse::new(communities)))
}

#[utoipa::path(patch, path = "/api/v1/admin/communities/{id}/approve", tag = "admin",
    params(("id" = String, Path, description = "Community id")),
    responses((status = 200, description = "Approved"), (status = 404, description = "No such community")))]
pub async fn approve_community(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageOnlyResponse>> {
    let message = AdminService::new(state.service_context())
        .approve_community(&admin, id)
        .await?;
    Ok(Json(MessageOnlyResponse::new(message)))
}

#[utoipa::path(patch, path = "/api/v1/admin/communities/{id}/reject", tag = "admin",
    params(("id" = String, Path, description = "Community id")),
    responses((status = 200, description = "Rejected"), (status = 404, description = "No such community")))]
pub async fn reject_community(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageOnlyResponse>> {
    let message = AdminService::new(state.service_context())
        .reject_community(&admin, id)
        .await?;
    Ok(Json(MessageOnlyResponse::new(message)))
}

#[utoipa::path(get, path = "/api/v1/admin/analytics", tag = "admin",
    responses((status = 200, description = "Dashboard charts")))]
pub async fn analytics(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<Json<ApiResponse<AnalyticsResponse>>> {
    let analytics = AdminService::new(state.service_context())
        .analytics(&admin)
        .await?;
    Ok(Json(ApiResponse::new(analytics)))
}
