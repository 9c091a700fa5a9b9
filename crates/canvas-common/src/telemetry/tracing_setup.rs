//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies. JSON output is
//! used in production or when `LOG_FORMAT=json`.

use std::env;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub level: Level,
    pub json: bool,
    /// Emit span open/close events
    pub span_events: bool,
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: true,
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            span_events: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            json: true,
            span_events: false,
            file_line: false,
        }
    }

    /// Pick a preset from `APP_ENV`, then apply `LOG_FORMAT`
    #[must_use]
    pub fn from_env() -> Self {
        let production = env::var("APP_ENV")
            .is_ok_and(|v| matches!(v.to_lowercase().as_str(), "production" | "prod"));
        let mut config = if production {
            Self::production()
        } else {
            Self::default()
        };
        if let Ok(format) = env::var("LOG_FORMAT") {
            config.json = format.eq_ignore_ascii_case("json");
        }
        config
    }
}

/// Initialize tracing from the environment. Safe to call more than once.
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::from_env())
}

pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let spans = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let json_layer = config.json.then(|| {
        fmt::layer()
            .json()
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_span_events(spans.clone())
    });
    let pretty_layer = (!config.json).then(|| {
        fmt::layer()
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_span_events(spans.clone())
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let dev = TracingConfig::development();
        assert_eq!(dev.level, Level::DEBUG);
        assert!(dev.span_events);
        assert!(!dev.json);

        let prod = TracingConfig::production();
        assert!(prod.json);
        assert!(!prod.file_line);
    }

    #[test]
    fn test_second_init_reports_already_initialized() {
        let _ = try_init_tracing_with_config(TracingConfig::default());
        assert!(matches!(
            try_init_tracing_with_config(TracingConfig::default()),
            Err(TracingError::AlreadyInitialized)
        ));
    }
}
