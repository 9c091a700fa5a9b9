//! Application configuration
//!
//! Everything is read from environment variables (a `.env` file is loaded first when
//! present). Required: `DATABASE_URL`, `JWT_SECRET`. Everything else has a default.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub snowflake: SnowflakeConfig,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
    /// Overrides the migrations shipped with `canvas-db`
    pub migrations_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token and cookie lifetime in seconds
    pub expires_in: i64,
    pub cookie_name: String,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Where uploads land and where watermarked artworks are published
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Scratch directory for raw uploads
    pub upload_dir: PathBuf,
    /// Permanent directory for watermarked output
    pub asset_dir: PathBuf,
    /// URL prefix the asset directory is served under
    pub asset_url_prefix: String,
    pub max_file_size_mb: u32,
}

impl StorageConfig {
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }
}

#[derive(Debug, Clone)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

fn default_app_name() -> String {
    "archicanvas".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_token_expiry() -> i64 {
    864_000 // 10 days
}

fn default_cookie_name() -> String {
    "jwt".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("./public/artworks")
}

fn default_asset_url_prefix() -> String {
    "/artworks".to_string()
}

fn default_max_file_size() -> u32 {
    10
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Vars(&lookup);

        Ok(Self {
            app: AppSettings {
                name: env.string("APP_NAME").unwrap_or_else(default_app_name),
                env: env.parse("APP_ENV")?.unwrap_or_default(),
            },
            api: ServerConfig {
                host: env.string("API_HOST").unwrap_or_else(default_host),
                port: env.parse("API_PORT")?.unwrap_or_else(default_port),
            },
            database: DatabaseConfig {
                url: env.required("DATABASE_URL")?,
                max_connections: env
                    .parse("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: env
                    .parse("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                run_migrations: env.parse("RUN_MIGRATIONS")?.unwrap_or(true),
                migrations_dir: env.string("MIGRATIONS_DIR").map(PathBuf::from),
            },
            jwt: JwtConfig {
                secret: env.required("JWT_SECRET")?,
                expires_in: env.parse("JWT_EXPIRES_IN")?.unwrap_or_else(default_token_expiry),
                cookie_name: env
                    .string("AUTH_COOKIE_NAME")
                    .unwrap_or_else(default_cookie_name),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: env
                    .parse("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: env.parse("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env
                    .string("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            storage: StorageConfig {
                upload_dir: env
                    .string("UPLOAD_DIR")
                    .map_or_else(default_upload_dir, PathBuf::from),
                asset_dir: env
                    .string("ASSET_DIR")
                    .map_or_else(default_asset_dir, PathBuf::from),
                asset_url_prefix: env
                    .string("ASSET_URL_PREFIX")
                    .unwrap_or_else(default_asset_url_prefix),
                max_file_size_mb: env
                    .parse("MAX_FILE_SIZE_MB")?
                    .unwrap_or_else(default_max_file_size),
            },
            snowflake: SnowflakeConfig {
                worker_id: env.parse("WORKER_ID")?.unwrap_or(0),
            },
        })
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.string(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.string(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
            })
            .transpose()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
