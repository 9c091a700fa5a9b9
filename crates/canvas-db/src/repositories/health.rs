//! Readiness probe backed by the pool

use async_trait::async_trait;
use sqlx::PgPool;

use canvas_core::{HealthProbe, RepoResult};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgHealthProbe {
    pool: PgPool,
}

impl PgHealthProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for PgHealthProbe {
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_db_error)
    }
}
