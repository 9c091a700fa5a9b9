//! Artwork model -> entity

use canvas_core::{Artwork, Snowflake};

use crate::models::ArtworkModel;

impl From<ArtworkModel> for Artwork {
    fn from(model: ArtworkModel) -> Self {
        Artwork {
            id: Snowflake::new(model.id),
            owner_id: Snowflake::new(model.owner_id),
            title: model.title,
            description: model.description,
            photo: model.photo,
            price: model.price,
            is_biddable: model.is_biddable,
            bidding_end_time: model.bidding_end_time,
            tags: model.tags,
            current_bid: model.current_bid,
            created_at: model.created_at,
        }
    }
}
