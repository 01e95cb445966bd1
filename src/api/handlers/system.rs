//! Health endpoint for load balancers and operators.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health report for the matcher and its store.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` when the store answers, `degraded` otherwise.
    status: &'static str,
    /// Number of groups, or `null` when the store is unreachable.
    groups: Option<usize>,
    /// Crate version.
    version: &'static str,
    /// RFC 3339 time the check ran.
    checked_at: String,
}

/// `GET /health`: store round-trip check.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Lists groups through the configured store. Answers 503 when the store \
                   cannot be read, since no round can be opened or paired then.",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, groups) = match state.directory.list_groups().await {
        Ok(groups) => (StatusCode::OK, Some(groups.len())),
        Err(e) => {
            tracing::warn!(error = %e, "health check could not read the store");
            (StatusCode::SERVICE_UNAVAILABLE, None)
        }
    };
    let body = HealthResponse {
        status: if groups.is_some() { "healthy" } else { "degraded" },
        groups,
        version: env!("CARGO_PKG_VERSION"),
        checked_at: Utc::now().to_rfc3339(),
    };
    (status, Json(body))
}

/// Routes served outside `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
