//! Test helpers for integration tests
//!
//! [`TestServer`] owns a running server plus the temporary directories behind it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use canvas_api::{create_app, AppState};
use canvas_common::{AppConfig, JwtService};
use canvas_core::SnowflakeGenerator;
use canvas_db::InMemoryStore;
use canvas_media::ArtworkStore;
use canvas_service::ServiceContext;
use reqwest::{multipart::Form, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{Account, PASSWORD};

pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    dir: TempDir,
    _handle: JoinHandle<()>,
}

/// Configuration pointing storage at `dir`, with a limiter loose enough for tests
pub fn test_config(dir: &TempDir) -> Result<AppConfig> {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "postgres://unused/archicanvas".to_string()),
        ("JWT_SECRET", "integration-secret".to_string()),
        ("JWT_EXPIRES_IN", "3600".to_string()),
        ("UPLOAD_DIR", dir.path().join("uploads").display().to_string()),
        ("ASSET_DIR", dir.path().join("artworks").display().to_string()),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000".to_string()),
        ("RATE_LIMIT_BURST", "1000".to_string()),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).cloned()).context("test config")
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let config = test_config(&dir)?;

        let store = ArtworkStore::from_config(&config.storage);
        store.ensure_dirs().await?;

        let ctx = ServiceContext::builder()
            .store(InMemoryStore::shared())
            .jwt_service(Arc::new(JwtService::new(
                &config.jwt.secret,
                config.jwt.expires_in,
            )))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(7)))
            .artwork_store(Arc::new(store))
            .build()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        let state = AppState::new(ctx, config);
        let app = create_app(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            dir,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Files under the upload scratch directory
    pub fn staged_uploads(&self) -> Result<usize> {
        Ok(std::fs::read_dir(self.dir.path().join("uploads"))?.count())
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn patch_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self
            .client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Response> {
        Ok(self.client.post(self.url(path)).multipart(form).send().await?)
    }

    pub async fn post_multipart_auth(&self, path: &str, token: &str, form: Form) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?)
    }

    /// Register through the API and sign in. Artists come back unapproved, so
    /// they are approved by `admin` first when one is given.
    pub async fn sign_up(&self, name: &str, role: &str, admin: Option<&Account>) -> Result<Account> {
        let email = format!("{}@example.com", name.to_lowercase());
        let payload = serde_json::json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "type": role,
            "specialization": (role == "artist").then_some("Oil painting"),
        });
        let registered: Value =
            assert_json(self.post("/api/v1/users/register", &payload).await?, StatusCode::CREATED)
                .await?;
        let id = registered["user"]["id"]
            .as_str()
            .context("user id")?
            .to_string();

        if let Some(admin) = admin {
            let path = format!("/api/v1/admin/artists/{id}/approve");
            assert_status(self.patch_auth(&path, &admin.token, &()).await?, StatusCode::OK).await?;
        }

        let token = self.login(&email, PASSWORD).await?;
        Ok(Account { id, email, token })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let body = serde_json::json!({ "email": email, "password": password });
        let session: Value =
            assert_json(self.post("/api/v1/users/login", &body).await?, StatusCode::OK).await?;
        Ok(session["token"].as_str().context("token")?.to_string())
    }
}

/// Assert response status and parse the JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error envelope and return its `code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .context("error envelope without code")
}
