//! PostgreSQL connection pool management

use std::path::Path;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

/// Migrations shipped with this crate
pub const DEFAULT_MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
    /// Idle time before a connection is closed
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl From<&canvas_common::DatabaseConfig> for DatabaseConfig {
    fn from(settings: &canvas_common::DatabaseConfig) -> Self {
        Self {
            max_connections: settings.max_connections,
            min_connections: settings.min_connections.min(settings.max_connections),
            ..Self::new(settings.url.clone())
        }
    }
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await
}

/// Apply pending migrations from `dir`, or from the bundled directory
pub async fn run_migrations(pool: &PgPool, dir: Option<&Path>) -> Result<(), MigrateError> {
    let dir = dir.unwrap_or_else(|| Path::new(DEFAULT_MIGRATIONS_DIR));
    let migrator = Migrator::new(dir).await?;
    migrator.run(pool).await?;
    info!(dir = %dir.display(), "Database migrations applied");
    Ok(())
}
