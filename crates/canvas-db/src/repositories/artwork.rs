//! PostgreSQL implementation of ArtworkRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use canvas_core::{
    ArtistRanking, Artwork, ArtworkRepository, RepoResult, Snowflake, TagCount,
};

use crate::models::{ArtistRankingModel, ArtworkModel, TagCountModel};

use super::error::map_db_error;

const ARTWORK_COLUMNS: &str = r"
    id, owner_id, title, description, photo, price, is_biddable, bidding_end_time,
    tags, current_bid, created_at
";

#[derive(Clone)]
pub struct PgArtworkRepository {
    pool: PgPool,
}

impl PgArtworkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtworkRepository for PgArtworkRepository {
    #[instrument(skip(self, artwork), fields(artwork_id = %artwork.id))]
    async fn create(&self, artwork: &Artwork) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO artworks (id, owner_id, title, description, photo, price, is_biddable,
                                  bidding_end_time, tags, current_bid, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(artwork.id.into_inner())
        .bind(artwork.owner_id.into_inner())
        .bind(&artwork.title)
        .bind(&artwork.description)
        .bind(&artwork.photo)
        .bind(artwork.price)
        .bind(artwork.is_biddable)
        .bind(artwork.bidding_end_time)
        .bind(&artwork.tags)
        .bind(artwork.current_bid)
        .bind(artwork.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Artwork>> {
        let sql = format!("SELECT {ARTWORK_COLUMNS} FROM artworks WHERE id = $1");
        let model = sqlx::query_as::<_, ArtworkModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(model.map(Artwork::from))
    }

    #[instrument(skip(self))]
    async fn list_newest(&self) -> RepoResult<Vec<Artwork>> {
        let sql = format!("SELECT {ARTWORK_COLUMNS} FROM artworks ORDER BY created_at DESC, id DESC");
        let models = sqlx::query_as::<_, ArtworkModel>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Artwork::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM artworks")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_by_owner(&self, owner_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM artworks WHERE owner_id = $1")
            .bind(owner_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn top_artists(&self, limit: i64) -> RepoResult<Vec<ArtistRanking>> {
        let rows = sqlx::query_as::<_, ArtistRankingModel>(
            r"
            SELECT u.name, COUNT(a.id) AS artwork_count
            FROM artworks a
            JOIN users u ON u.id = a.owner_id
            GROUP BY u.id, u.name
            ORDER BY artwork_count DESC, u.name
            LIMIT $1
            ",
        )
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ArtistRanking::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_tag(&self) -> RepoResult<Vec<TagCount>> {
        let rows = sqlx::query_as::<_, TagCountModel>(
            r"
            SELECT t.tag AS name, COUNT(*) AS value
            FROM artworks a
            CROSS JOIN LATERAL UNNEST(a.tags) AS t(tag)
            GROUP BY t.tag
            ORDER BY value DESC, name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(TagCount::from).collect())
    }
}
