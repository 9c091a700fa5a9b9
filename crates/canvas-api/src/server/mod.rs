//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use canvas_common::{AppConfig, AppError, JwtService};
use canvas_core::SnowflakeGenerator;
use canvas_db::{create_pool, run_migrations, DatabaseConfig};
use canvas_media::ArtworkStore;
use canvas_service::ServiceContext;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config().clone();

    let api = create_router().layer(DefaultBodyLimit::max(config.storage.max_body_bytes()));
    let api = apply_rate_limit(api, &config.rate_limit);

    let prefix = config.storage.asset_url_prefix.trim_end_matches('/');
    let router = api
        .merge(health_routes())
        .nest_service(prefix, ServeDir::new(&config.storage.asset_dir));

    apply_middleware(router, &config.cors, config.app.env.is_production()).with_state(state)
}

/// Connect to PostgreSQL, apply migrations and wire the services
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, config.database.migrations_dir.as_deref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let store = ArtworkStore::from_config(&config.storage);
    store
        .ensure_dirs()
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    let service_context = ServiceContext::builder()
        .postgres(&pool)
        .jwt_service(Arc::new(JwtService::new(
            &config.jwt.secret,
            config.jwt.expires_in,
        )))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .artwork_store(Arc::new(store))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server until it fails
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let state = create_app_state(config).await?;
    let app = create_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;
    info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use canvas_db::InMemoryStore;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::collections::HashMap;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app() -> (Router, TempDir) {
        app_with(&[])
    }

    fn app_with(extra: &[(&'static str, &str)]) -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut vars = HashMap::from([
            ("DATABASE_URL", "postgres://unused/archicanvas".to_string()),
            ("JWT_SECRET", "router-secret".to_string()),
            ("UPLOAD_DIR", dir.path().join("uploads").display().to_string()),
            ("ASSET_DIR", dir.path().join("artworks").display().to_string()),
        ]);
        vars.extend(extra.iter().map(|(key, value)| (*key, value.to_string())));
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let ctx = ServiceContext::builder()
            .store(InMemoryStore::shared())
            .jwt_service(Arc::new(JwtService::new(&config.jwt.secret, 3600)))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .artwork_store(Arc::new(ArtworkStore::from_config(&config.storage)))
            .build()
            .unwrap();

        (create_app(AppState::new(ctx, config)), dir)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = app();
        let (status, body) = send(app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "archicanvas");
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let (app, _dir) = app();
        let (status, body) = send(app, get("/api/v1/users/me")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_AUTH");
        assert!(body["error"]["message"].as_str().unwrap().contains("not logged in"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let (app, _dir) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/users/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_public_catalogue_starts_empty() {
        let (app, _dir) = app();
        let (status, body) = send(app, get("/api/v1/products")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_post_is_not_found() {
        let (app, _dir) = app();
        let (status, body) = send(app.clone(), get("/api/v1/posts")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());

        let (status, body) = send(app, get("/api/v1/posts/12345")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UNKNOWN_POST");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let (app, _dir) = app();
        let (status, body) = send(app, get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/users/login"].is_object());
    }

    #[tokio::test]
    async fn test_rate_limited_request_uses_error_envelope() {
        let (app, _dir) = app_with(&[
            ("RATE_LIMIT_REQUESTS_PER_SECOND", "1"),
            ("RATE_LIMIT_BURST", "1"),
        ]);

        let (status, _) = send(app.clone(), get("/api/v1/products")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app, get("/api/v1/products")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
        assert_eq!(body["error"]["message"], "Rate limit exceeded");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (app, _dir) = app();
        let (status, _) = send(app, get("/api/v1/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
