//! Middleware stack for the API server
//!
//! Request ids, tracing, timeouts, compression, CORS and rate limiting.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    Router,
};
use canvas_common::{AppError, CorsConfig, RateLimitConfig};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::response::ApiError;
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Global rate limit for the versioned API
///
/// An unusable configuration (zero rate or burst) disables the limiter instead of
/// failing startup.
pub fn apply_rate_limit(router: Router<AppState>, config: &RateLimitConfig) -> Router<AppState> {
    // One permit is replenished every `period_ms`
    let period_ms = match config.requests_per_second {
        0 => 0,
        rps => (1000 / u64::from(rps)).max(1),
    };
    let governor = GovernorConfigBuilder::default()
        .per_millisecond(period_ms)
        .burst_size(config.burst)
        .key_extractor(GlobalKeyExtractor)
        .finish();

    match governor {
        Some(governor) => router
            .layer(GovernorLayer {
                config: Arc::new(governor),
            })
            .layer(map_response(rate_limit_envelope)),
        None => {
            warn!(
                requests_per_second = config.requests_per_second,
                burst = config.burst,
                "Invalid rate limit settings, rate limiting disabled"
            );
            router
        }
    }
}

/// Re-renders the limiter's plain-text 429 in the API error envelope, keeping its
/// retry headers.
async fn rate_limit_envelope(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if response.status() != StatusCode::TOO_MANY_REQUESTS || is_json {
        return response;
    }

    let mut envelope = ApiError::App(AppError::RateLimitExceeded).into_response();
    for (name, value) in response.headers() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            envelope.headers_mut().append(name.clone(), value.clone());
        }
    }
    envelope
}

/// Outer stack shared by every route
///
/// Request -> RequestID -> Trace -> Timeout -> Compression -> CORS -> Handler
pub fn apply_middleware(
    router: Router<AppState>,
    cors_config: &CorsConfig,
    is_production: bool,
) -> Router<AppState> {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(create_cors_layer(cors_config, is_production))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// CORS with credentials, so the session cookie crosses origins
///
/// Configured origins are always honoured. Without any, development mirrors the
/// request origin and production allows none.
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if !config.allowed_origins.is_empty() {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                origin.parse::<HeaderValue>().ok().or_else(|| {
                    warn!(origin = %origin, "Invalid CORS origin");
                    None
                })
            })
            .collect();
        info!(count = origins.len(), "CORS: allowing configured origins");
        base.allow_origin(AllowOrigin::list(origins))
    } else if is_production {
        warn!("CORS: no allowed origins configured in production; cross-origin requests blocked");
        base.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()))
    } else {
        warn!("CORS: mirroring any origin (development). Set CORS_ALLOWED_ORIGINS for production.");
        base.allow_origin(AllowOrigin::mirror_request())
    }
}
