//! Service context - dependency container for services
//!
//! Holds the repositories, the session token service, the id generator and the
//! artwork store. Cloning is cheap; everything sits behind an `Arc`.

use std::sync::Arc;

use canvas_common::JwtService;
use canvas_core::{
    ArtworkRepository, CommunityRepository, HealthProbe, MessageRepository, PostRepository,
    Snowflake, SnowflakeGenerator, UserRepository,
};
use canvas_db::{
    PgArtworkRepository, PgCommunityRepository, PgHealthProbe, PgMessageRepository, PgPool,
    PgPostRepository, PgUserRepository,
};
use canvas_media::ArtworkStore;

use super::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    community_repo: Arc<dyn CommunityRepository>,
    message_repo: Arc<dyn MessageRepository>,
    artwork_repo: Arc<dyn ArtworkRepository>,
    post_repo: Arc<dyn PostRepository>,
    health: Arc<dyn HealthProbe>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    artwork_store: Arc<ArtworkStore>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn community_repo(&self) -> &dyn CommunityRepository {
        self.community_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn artwork_repo(&self) -> &dyn ArtworkRepository {
        self.artwork_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn health(&self) -> &dyn HealthProbe {
        self.health.as_ref()
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn artwork_store(&self) -> &ArtworkStore {
        self.artwork_store.as_ref()
    }

    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .field("artwork_store", &self.artwork_store)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    community_repo: Option<Arc<dyn CommunityRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    artwork_repo: Option<Arc<dyn ArtworkRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    health: Option<Arc<dyn HealthProbe>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    artwork_store: Option<Arc<ArtworkStore>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the PostgreSQL repositories on `pool`
    pub fn postgres(self, pool: &PgPool) -> Self {
        self.user_repo(Arc::new(PgUserRepository::new(pool.clone())))
            .community_repo(Arc::new(PgCommunityRepository::new(pool.clone())))
            .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
            .artwork_repo(Arc::new(PgArtworkRepository::new(pool.clone())))
            .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
            .health(Arc::new(PgHealthProbe::new(pool.clone())))
    }

    /// Use one store for every repository, e.g. `canvas_db::InMemoryStore`
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: UserRepository
            + CommunityRepository
            + MessageRepository
            + ArtworkRepository
            + PostRepository
            + HealthProbe
            + 'static,
    {
        self.user_repo(store.clone())
            .community_repo(store.clone())
            .message_repo(store.clone())
            .artwork_repo(store.clone())
            .post_repo(store.clone())
            .health(store)
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn community_repo(mut self, repo: Arc<dyn CommunityRepository>) -> Self {
        self.community_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn artwork_repo(mut self, repo: Arc<dyn ArtworkRepository>) -> Self {
        self.artwork_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn health(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.health = Some(probe);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn artwork_store(mut self, store: Arc<ArtworkStore>) -> Self {
        self.artwork_store = Some(store);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            community_repo: required(self.community_repo, "community_repo")?,
            message_repo: required(self.message_repo, "message_repo")?,
            artwork_repo: required(self.artwork_repo, "artwork_repo")?,
            post_repo: required(self.post_repo, "post_repo")?,
            health: required(self.health, "health")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            artwork_store: required(self.artwork_store, "artwork_store")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_db::InMemoryStore;

    #[test]
    fn test_build_requires_everything() {
        let err = ServiceContextBuilder::new()
            .store(InMemoryStore::shared())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("jwt_service is required"));
    }

    #[test]
    fn test_build_with_in_memory_store() {
        let ctx = ServiceContext::builder()
            .store(InMemoryStore::shared())
            .jwt_service(Arc::new(JwtService::new("secret", 60)))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .artwork_store(Arc::new(ArtworkStore::new("/tmp/u", "/tmp/a", "/artworks")))
            .build()
            .unwrap();
        assert_ne!(ctx.generate_id(), ctx.generate_id());
    }
}
