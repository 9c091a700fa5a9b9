//! Path parameter extractor for snowflake ids

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use canvas_core::Snowflake;

use crate::response::ApiError;

/// The single `:id` segment of a route, parsed as a snowflake
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Snowflake::parse(&raw)
            .map(IdPath)
            .map_err(|_| ApiError::invalid_path(format!("'{raw}' is not a valid id")))
    }
}
