use canvas_core::{ArtistRanking, DailyCount, TagCount};

use crate::models::{ArtistRankingModel, DailyCountModel, TagCountModel};

impl From<DailyCountModel> for DailyCount {
    fn from(model: DailyCountModel) -> Self {
        DailyCount {
            date: model.date,
            count: model.count,
        }
    }
}

impl From<ArtistRankingModel> for ArtistRanking {
    fn from(model: ArtistRankingModel) -> Self {
        ArtistRanking {
            name: model.name,
            artwork_count: model.artwork_count,
        }
    }
}

impl From<TagCountModel> for TagCount {
    fn from(model: TagCountModel) -> Self {
        TagCount {
            name: model.name,
            value: model.value,
        }
    }
}
