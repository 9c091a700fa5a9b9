//! Artwork catalogue handlers
//!
//! Listing is public. Uploads arrive as `multipart/form-data` with text fields
//! `title`, `description`, `price`, `isBiddable`, `biddingDays`, `tags` (a JSON array)
//! and the `photo` file.

use axum::{
    extract::{Multipart, State},
    Json,
};
use canvas_service::dto::{
    ApiResponse, ArtworkResponse, CreatedArtworkResponse, MessageOnlyResponse, PurchaseRequest,
};
use canvas_service::{ArtworkService, NewArtwork};
use tracing::debug;

use crate::extractors::{AuthUser, IdPath};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/v1/products", tag = "products",
    responses((status = 200, description = "Artworks, newest first")))]
pub async fn list_products(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<ArtworkResponse>>>> {
    let artworks = ArtworkService::new(state.service_context()).list().await?;
    Ok(Json(ApiResponse::new(artworks)))
}

#[utoipa::path(get, path = "/api/v1/products/{id}", tag = "products",
    params(("id" = String, Path, description = "Artwork id")),
    responses(
        (status = 200, description = "The artwork"),
        (status = 404, description = "No such artwork")
    ))]
pub async fn get_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<ArtworkResponse>>> {
    let artwork = ArtworkService::new(state.service_context()).get(id).await?;
    Ok(Json(ApiResponse::new(artwork)))
}

#[utoipa::path(post, path = "/api/v1/products", tag = "products",
    responses(
        (status = 201, description = "Watermarked and listed"),
        (status = 400, description = "Missing photo or malformed fields"),
        (status = 403, description = "Only artists may sell"),
        (status = 500, description = "Watermarking failed")
    ))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> ApiResult<Created<Json<ApiResponse<CreatedArtworkResponse>>>> {
    let form = read_form(multipart).await?;
    let created = ArtworkService::new(state.service_context())
        .create(&user, form)
        .await?;
    Ok(Created(Json(ApiResponse::with_message(
        "Artwork uploaded successfully!",
        created,
    ))))
}

#[utoipa::path(post, path = "/api/v1/products/{id}/buy-request", tag = "products",
    params(("id" = String, Path, description = "Artwork id")),
    responses(
        (status = 200, description = "Inquiry sent"),
        (status = 400, description = "Caller owns the artwork"),
        (status = 404, description = "Artwork or artist missing")
    ))]
pub async fn buy_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    body: Option<Json<PurchaseRequest>>,
) -> ApiResult<Json<MessageOnlyResponse>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let message = ArtworkService::new(state.service_context())
        .request_purchase(id, &user, request)
        .await?;
    Ok(Json(MessageOnlyResponse::new(message)))
}

async fn read_form(mut multipart: Multipart) -> Result<NewArtwork, ApiError> {
    let mut form = NewArtwork::default();

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
            "price" => form.price = Some(text),
            "isBiddable" => form.is_biddable = Some(text),
            "biddingDays" => form.bidding_days = Some(text),
            "tags" => form.tags = Some(text),
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}
