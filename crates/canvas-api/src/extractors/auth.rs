//! Authentication extractor
//!
//! Reads the session token from the auth cookie, falling back to the
//! `Authorization: Bearer` header, and resolves it to a stored user.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use canvas_common::AppError;
use canvas_core::User;
use canvas_service::{AuthService, ServiceError};

use crate::response::ApiError;
use crate::state::AppState;

/// The caller behind a valid session
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let token = match jar.get(app_state.cookie_name()) {
            Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
            _ => {
                let TypedHeader(Authorization(bearer)) =
                    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                        .await
                        .map_err(|_| ApiError::App(AppError::MissingAuth))?;
                bearer.token().to_string()
            }
        };

        let user = AuthService::new(app_state.service_context())
            .authenticate(&token)
            .await?;

        Ok(AuthUser(user))
    }
}

/// An authenticated caller holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "Non-admin hit an admin route");
            return Err(ServiceError::permission_denied(
                "You do not have permission to perform this action",
            )
            .into());
        }
        Ok(AdminUser(user))
    }
}
