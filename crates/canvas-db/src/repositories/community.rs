//! PostgreSQL implementation of CommunityRepository
//!
//! Membership lives in `community_members` / `community_pending_members`. Every
//! transition locks the community row first so concurrent approvals serialize.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use canvas_core::{
    ApprovalStatus, Community, CommunityRepository, DomainError, RepoResult, Snowflake,
};

use crate::mappers::escape_like;
use crate::models::CommunityModel;

use super::error::{map_db_error, map_unique_violation};

const SELECT_COMMUNITY: &str = r"
    SELECT c.id, c.name, c.description, c.creator_id, c.member_count, c.status,
           ARRAY(SELECT m.user_id FROM community_members m
                 WHERE m.community_id = c.id
                 ORDER BY m.joined_at, m.user_id) AS members,
           ARRAY(SELECT p.user_id FROM community_pending_members p
                 WHERE p.community_id = c.id
                 ORDER BY p.requested_at, p.user_id) AS pending_members,
           c.created_at, c.updated_at
    FROM communities c
";

#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
}

impl PgCommunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock the community row for the rest of the transaction
    async fn lock(tx: &mut Transaction<'_, Postgres>, id: Snowflake) -> RepoResult<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM communities WHERE id = $1 FOR UPDATE")
            .bind(id.into_inner())
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_db_error)?;
        Ok(found.is_some())
    }

    async fn fetch_many(&self, sql: &str, bind: Option<String>) -> RepoResult<Vec<Community>> {
        let mut query = sqlx::query_as::<_, CommunityModel>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(Community::try_from)
            .collect()
    }
}

#[async_trait]
impl CommunityRepository for PgCommunityRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Community>> {
        let sql = format!("{SELECT_COMMUNITY} WHERE c.id = $1");
        sqlx::query_as::<_, CommunityModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(Community::try_from)
            .transpose()
    }

    #[instrument(skip(self, community), fields(community_id = %community.id))]
    async fn create(&self, community: &Community) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO communities (id, name, description, creator_id, member_count, status,
                                     created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(community.id.into_inner())
        .bind(&community.name)
        .bind(&community.description)
        .bind(community.creator_id.into_inner())
        .bind(community.member_count)
        .bind(community.status.as_str())
        .bind(community.created_at)
        .bind(community.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::CommunityNameTaken))?;

        for member in &community.members {
            sqlx::query("INSERT INTO community_members (community_id, user_id) VALUES ($1, $2)")
                .bind(community.id.into_inner())
                .bind(member.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_approved(&self, search: Option<&str>) -> RepoResult<Vec<Community>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        match pattern {
            Some(pattern) => {
                let sql = format!(
                    "{SELECT_COMMUNITY}
                     WHERE c.status = 'approved'
                       AND (c.name ILIKE $1 OR c.description ILIKE $1)
                     ORDER BY c.id"
                );
                self.fetch_many(&sql, Some(pattern)).await
            }
            None => {
                let sql = format!("{SELECT_COMMUNITY} WHERE c.status = 'approved' ORDER BY c.id");
                self.fetch_many(&sql, None).await
            }
        }
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: ApprovalStatus) -> RepoResult<Vec<Community>> {
        let sql = format!("{SELECT_COMMUNITY} WHERE c.status = $1 ORDER BY c.id");
        self.fetch_many(&sql, Some(status.as_str().to_string())).await
    }

    #[instrument(skip(self))]
    async fn set_status(
        &self,
        id: Snowflake,
        status: ApprovalStatus,
    ) -> RepoResult<Option<Community>> {
        let result = sqlx::query("UPDATE communities SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.into_inner())
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn add_pending(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Community>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        if !Self::lock(&mut tx, id).await? {
            return Ok(None);
        }

        let inserted = sqlx::query(
            r"
            INSERT INTO community_pending_members (community_id, user_id)
            SELECT $1, $2
            WHERE NOT EXISTS (
                SELECT 1 FROM community_members WHERE community_id = $1 AND user_id = $2
            )
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if inserted > 0 {
            sqlx::query("UPDATE communities SET updated_at = NOW() WHERE id = $1")
                .bind(id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        } else {
            debug!("Join request was a no-op");
        }

        tx.commit().await.map_err(map_db_error)?;
        self.find_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn approve_member(
        &self,
        id: Snowflake,
        member_id: Snowflake,
    ) -> RepoResult<Option<Community>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        if !Self::lock(&mut tx, id).await? {
            return Ok(None);
        }

        sqlx::query("DELETE FROM community_pending_members WHERE community_id = $1 AND user_id = $2")
            .bind(id.into_inner())
            .bind(member_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO community_members (community_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(id.into_inner())
        .bind(member_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // The counter moves even when the member was already present
        sqlx::query(
            r"
            UPDATE communities
            SET member_count = member_count + 1, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        self.find_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn reject_member(
        &self,
        id: Snowflake,
        member_id: Snowflake,
    ) -> RepoResult<Option<Community>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        if !Self::lock(&mut tx, id).await? {
            return Ok(None);
        }

        let removed = sqlx::query(
            "DELETE FROM community_pending_members WHERE community_id = $1 AND user_id = $2",
        )
        .bind(id.into_inner())
        .bind(member_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if removed > 0 {
            sqlx::query("UPDATE communities SET updated_at = NOW() WHERE id = $1")
                .bind(id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        self.find_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn remove_member(
        &self,
        id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Community>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        if !Self::lock(&mut tx, id).await? {
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM community_members WHERE community_id = $1 AND user_id = $2")
            .bind(id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        if removed > 0 {
            sqlx::query(
                r"
                UPDATE communities
                SET member_count = member_count - 1, updated_at = NOW()
                WHERE id = $1
                ",
            )
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        self.find_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn count_by_status(&self, status: ApprovalStatus) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM communities WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn top_by_member_count(&self, limit: i64) -> RepoResult<Vec<Community>> {
        let sql = format!(
            "{SELECT_COMMUNITY}
             WHERE c.status = 'approved'
             ORDER BY c.member_count DESC, c.id
             LIMIT {}",
            limit.clamp(1, 100)
        );
        self.fetch_many(&sql, None).await
    }
}
