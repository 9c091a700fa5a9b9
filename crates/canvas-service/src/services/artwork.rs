//! Artwork service
//!
//! Listing artworks for sale, the public catalogue, and purchase inquiries.

use canvas_core::{bidding_window_end, Artwork, DomainError, Snowflake, User};
use chrono::Utc;
use tracing::{info, instrument};

use crate::dto::{ArtworkResponse, CreatedArtworkResponse, PurchaseRequest, UserDirectory};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Raw fields of the artwork upload form
#[derive(Debug, Clone, Default)]
pub struct NewArtwork {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub is_biddable: Option<String>,
    pub bidding_days: Option<String>,
    /// JSON array of strings
    pub tags: Option<String>,
    pub photo: Option<Vec<u8>>,
}

/// Validated form
struct ArtworkDraft {
    title: String,
    description: String,
    price: f64,
    is_biddable: bool,
    bidding_days: i64,
    tags: Vec<String>,
    photo: Vec<u8>,
}

impl NewArtwork {
    fn validate(self) -> ServiceResult<ArtworkDraft> {
        let title = required_text(self.title, "title")?;
        let description = required_text(self.description, "description")?;

        let price = required_text(self.price, "price")?
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| ServiceError::validation("Price must be a non-negative number."))?;

        let is_biddable = match self.is_biddable.as_deref().map(str::trim) {
            None | Some("" | "false" | "0" | "off") => false,
            Some("true" | "1" | "on") => true,
            Some(_) => return Err(ServiceError::validation("isBiddable must be true or false.")),
        };

        let bidding_days = match self.bidding_days.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| ServiceError::validation("biddingDays must be a whole number."))?,
        };

        let tags = match self.tags.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(raw) => serde_json::from_str::<Vec<String>>(raw)
                .map_err(|_| ServiceError::validation("Tags must be a JSON array of strings."))?
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        };

        let photo = self
            .photo
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| ServiceError::validation("Please upload an image of the artwork."))?;

        Ok(ArtworkDraft {
            title,
            description,
            price,
            is_biddable,
            bidding_days,
            tags,
            photo,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> ServiceResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::validation(format!("Please provide the artwork {field}.")))
}

pub struct ArtworkService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ArtworkService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Watermark the photo, store the artwork, then count it on the owner
    #[instrument(skip(self, owner, form), fields(owner_id = %owner.id))]
    pub async fn create(
        &self,
        owner: &User,
        form: NewArtwork,
    ) -> ServiceResult<CreatedArtworkResponse> {
        if !owner.role.can_sell() {
            return Err(DomainError::RoleNotAllowed(owner.role.to_string()).into());
        }
        let draft = form.validate()?;

        let store = self.ctx.artwork_store();
        let image = store.publish(&draft.photo, Some(&owner.name)).await?;

        let now = Utc::now();
        let artwork = Artwork {
            id: self.ctx.generate_id(),
            owner_id: owner.id,
            title: draft.title,
            description: draft.description,
            photo: image.public_path,
            price: draft.price,
            is_biddable: draft.is_biddable,
            bidding_end_time: draft
                .is_biddable
                .then(|| bidding_window_end(now, draft.bidding_days)),
            tags: draft.tags,
            current_bid: 0.0,
            created_at: now,
        };
        if let Err(e) = self.ctx.artwork_repo().create(&artwork).await {
            store.discard(&image.file_path).await;
            return Err(e.into());
        }

        let updated = self
            .ctx
            .user_repo()
            .record_artwork(owner.id)
            .await?
            .ok_or(DomainError::UserNotFound(owner.id))?;
        let new_badges = updated.badges.difference(owner.badges).names();

        info!(
            artwork_id = %artwork.id,
            artwork_count = updated.artwork_count,
            new_badges = ?new_badges,
            "Artwork listed"
        );

        Ok(CreatedArtworkResponse {
            artwork: ArtworkResponse::build(&artwork, &UserDirectory::new(vec![updated.clone()])),
            artwork_count: updated.artwork_count,
            new_badges,
        })
    }

    /// Newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<ArtworkResponse>> {
        let artworks = self.ctx.artwork_repo().list_newest().await?;

        let mut owner_ids: Vec<Snowflake> = artworks.iter().map(|a| a.owner_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();
        let owners = UserDirectory::new(self.ctx.user_repo().find_many(&owner_ids).await?);

        Ok(artworks
            .iter()
            .map(|a| ArtworkResponse::build(a, &owners))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, artwork_id: Snowflake) -> ServiceResult<ArtworkResponse> {
        let artwork = self.find(artwork_id).await?;
        let owners = UserDirectory::new(self.ctx.user_repo().find_many(&[artwork.owner_id]).await?);
        Ok(ArtworkResponse::build(&artwork, &owners))
    }

    /// Record a buyer's interest. Delivery to the artist happens outside this service.
    #[instrument(skip(self, buyer, request), fields(buyer_id = %buyer.id))]
    pub async fn request_purchase(
        &self,
        artwork_id: Snowflake,
        buyer: &User,
        request: PurchaseRequest,
    ) -> ServiceResult<String> {
        let artwork = self.find(artwork_id).await?;
        let artist = self
            .ctx
            .user_repo()
            .find_by_id(artwork.owner_id)
            .await?
            .ok_or(DomainError::ArtistNotFound(artwork.owner_id))?;

        if artwork.is_owned_by(buyer.id) {
            return Err(DomainError::CannotBuyOwnArtwork.into());
        }

        info!(
            artwork_id = %artwork.id,
            title = %artwork.title,
            artist_email = %artist.email,
            buyer_name = %buyer.name,
            buyer_email = %buyer.email,
            note = request.message.as_deref().unwrap_or(""),
            "Purchase inquiry"
        );
        Ok("Purchase inquiry sent to the artist!".to_string())
    }

    async fn find(&self, artwork_id: Snowflake) -> ServiceResult<Artwork> {
        self.ctx
            .artwork_repo()
            .find_by_id(artwork_id)
            .await?
            .ok_or_else(|| DomainError::ArtworkNotFound(artwork_id).into())
    }
}
