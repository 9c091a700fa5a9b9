//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use canvas_core::{ApprovalStatus, DomainError, RepoResult, Role, Snowflake, User, UserRepository};

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation};

const USER_COLUMNS: &str = r"
    id, name, email, role, specialization, bio, status, artwork_count, badges,
    password_changed_at, created_at, updated_at
";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_users(models: Vec<UserModel>) -> RepoResult<Vec<User>> {
    models.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, UserModel>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)");
        let models = sqlx::query_as::<_, UserModel>(&sql)
            .bind(raw)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_users(models)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash, role, specialization, bio,
                               status, artwork_count, badges, password_changed_at,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(user.role.as_str())
        .bind(&user.specialization)
        .bind(&user.bio)
        .bind(user.status.as_str())
        .bind(user.artwork_count)
        .bind(user.badges.names())
        .bind(user.password_changed_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(
        &self,
        id: Snowflake,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $2, password_changed_at = $3, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .bind(changed_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_pending_artists(&self) -> RepoResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE role = 'artist' AND status = 'pending'
             ORDER BY created_at, id"
        );
        let models = sqlx::query_as::<_, UserModel>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_users(models)
    }

    #[instrument(skip(self))]
    async fn set_artist_status(
        &self,
        id: Snowflake,
        status: ApprovalStatus,
    ) -> RepoResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET status = $2, updated_at = NOW()
             WHERE id = $1 AND role = 'artist'
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, UserModel>(&sql)
            .bind(id.into_inner())
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn record_artwork(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        let Some(model) = sqlx::query_as::<_, UserModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
        else {
            return Ok(None);
        };

        let mut user = User::try_from(model)?;
        user.record_artwork();

        sqlx::query(
            r"
            UPDATE users
            SET artwork_count = $2, badges = $3, updated_at = $4
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(user.artwork_count)
        .bind(user.badges.names())
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(Some(user))
    }

    #[instrument(skip(self))]
    async fn count_by_role(&self, role: Role) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
