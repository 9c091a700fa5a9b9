//! # canvas-db
//!
//! Storage layer for ArchiCanvas.
//!
//! ## Overview
//!
//! This crate provides two implementations of every repository trait defined in
//! `canvas-core`:
//!
//! - PostgreSQL repositories on top of SQLx, migrated from the `migrations/` directory
//! - [`InMemoryStore`], a DashMap-backed store used by tests and demos
//!
//! ## Usage
//!
//! ```rust,ignore
//! use canvas_db::{create_pool, run_migrations, DatabaseConfig, PgUserRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::new("postgres://localhost/archicanvas")).await?;
//!     run_migrations(&pool, None).await?;
//!     let users = PgUserRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

pub use memory::InMemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool, DEFAULT_MIGRATIONS_DIR};
pub use repositories::{
    PgArtworkRepository, PgCommunityRepository, PgHealthProbe, PgMessageRepository,
    PgPostRepository, PgUserRepository,
};
