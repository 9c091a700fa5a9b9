//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use canvas_core::{DailyCount, Message, MessageRepository, RepoResult, Snowflake};

use crate::models::{DailyCountModel, MessageModel};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO messages (id, community_id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.community_id.into_inner())
        .bind(message.author_id.into_inner())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_community(
        &self,
        community_id: Snowflake,
        after: Option<Snowflake>,
    ) -> RepoResult<Vec<Message>> {
        let models = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, community_id, author_id, content, created_at
            FROM messages
            WHERE community_id = $1 AND ($2::BIGINT IS NULL OR id > $2)
            ORDER BY created_at, id
            ",
        )
        .bind(community_id.into_inner())
        .bind(after.map(Snowflake::into_inner))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn daily_counts_since(&self, since: DateTime<Utc>) -> RepoResult<Vec<DailyCount>> {
        let rows = sqlx::query_as::<_, DailyCountModel>(
            r"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS date, COUNT(*) AS count
            FROM messages
            WHERE created_at >= $1
            GROUP BY 1
            ORDER BY 1
            ",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(DailyCount::from).collect())
    }
}
