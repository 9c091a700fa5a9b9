//! Account handlers
//!
//! Registration, the cookie-backed session, the caller's profile and badges.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use canvas_service::dto::{
    ApiResponse, BadgesResponse, ChangePasswordRequest, LoginRequest, LoginResponse,
    MessageOnlyResponse, RegisterRequest, RegisterResponse, UserResponse,
};
use canvas_service::{AuthService, UserService};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// HttpOnly cookie carrying the session token
fn session_cookie(state: &AppState, token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((state.cookie_name().to_string(), token))
        .http_only(true)
        .secure(state.secure_cookies())
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

#[utoipa::path(post, path = "/api/v1/users/register", tag = "users",
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered")
    ))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<RegisterResponse>>> {
    let response = AuthService::new(state.service_context())
        .register(request)
        .await?;
    Ok(Created(Json(response)))
}

#[utoipa::path(post, path = "/api/v1/users/login", tag = "users",
    responses(
        (status = 200, description = "Signed in; session cookie set"),
        (status = 401, description = "Wrong email or password"),
        (status = 403, description = "Artist account awaiting approval")
    ))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let response = AuthService::new(state.service_context())
        .login(request)
        .await?;
    let cookie = session_cookie(&state, response.token.clone(), response.expires_in);
    Ok((jar.add(cookie), Json(response)))
}

#[utoipa::path(post, path = "/api/v1/users/logout", tag = "users",
    responses((status = 200, description = "Session cookie cleared")))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageOnlyResponse>) {
    let jar = jar.remove(Cookie::build(state.cookie_name().to_string()).path("/"));
    (jar, Json(MessageOnlyResponse::new("Logged out successfully")))
}

#[utoipa::path(get, path = "/api/v1/users/me", tag = "users",
    responses(
        (status = 200, description = "Profile of the caller"),
        (status = 401, description = "Not signed in")
    ))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::new(UserService::new(state.service_context()).me(&user)))
}

#[utoipa::path(patch, path = "/api/v1/users/me/password", tag = "users",
    responses(
        (status = 200, description = "Password changed; new session issued"),
        (status = 401, description = "Current password is wrong")
    ))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let response = AuthService::new(state.service_context())
        .change_password(&user, request)
        .await?;
    let cookie = session_cookie(&state, response.token.clone(), response.expires_in);
    Ok((jar.add(cookie), Json(response)))
}

#[utoipa::path(get, path = "/api/v1/users/my-badges", tag = "users",
    responses((status = 200, description = "Artwork count and earned badges")))]
pub async fn my_badges(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<ApiResponse<BadgesResponse>>> {
    let badges = UserService::new(state.service_context())
        .my_badges(&user)
        .await?;
    Ok(Json(ApiResponse::new(badges)))
}
