//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use canvas_core::{Post, PostRepository, RepoResult, Snowflake};

use crate::models::PostModel;

use super::error::map_db_error;

const POST_COLUMNS: &str = "id, title, description, story, photo, tags, created_at";

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, title, description, story, photo, tags, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(post.id.into_inner())
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.story)
        .bind(&post.photo)
        .bind(&post.tags)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let model = sqlx::query_as::<_, PostModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(model.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn list_newest(&self) -> RepoResult<Vec<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC");
        let models = sqlx::query_as::<_, PostModel>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Post::from).collect())
    }
}
