//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use canvas_service::dto::{HealthResponse, ReadinessResponse};
use tracing::warn;

use crate::state::AppState;

/// Liveness probe
#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Process is up")))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: state.config().app.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe: the store must answer
#[utoipa::path(get, path = "/health/ready", tag = "health",
    responses(
        (status = 200, description = "Store reachable"),
        (status = 503, description = "Store unreachable")
    ))]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    match state.service_context().health().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                database: "up",
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "degraded",
                    database: "down",
                }),
            )
        }
    }
}
