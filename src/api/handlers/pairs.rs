//! Pair handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::put;
use axum::{Json, Router};

use crate::api::dto::{PairDto, RecordMetRequest};
use crate::app_state::AppState;
use crate::domain::PairId;
use crate::error::{ErrorResponse, MatcherError};

/// `PUT /pairs/{id}/met`: Record whether a pair met.
///
/// # Errors
///
/// Returns [`MatcherError::PairNotFound`] if the pair does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/pairs/{id}/met",
    tag = "Pairs",
    summary = "Record meeting outcome",
    description = "Sets the pair's outcome to `met`, `not_met` or back to `unknown`.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pair UUID"),
    ),
    request_body = RecordMetRequest,
    responses(
        (status = 200, description = "Updated pair", body = PairDto),
        (status = 404, description = "Pair not found", body = ErrorResponse),
    )
)]
pub async fn record_met(
    State(state): State<AppState>,
    Path(id): Path<PairId>,
    Json(req): Json<RecordMetRequest>,
) -> Result<impl IntoResponse, MatcherError> {
    let pair = state.rounds.record_met(id, req.met).await?;
    Ok(Json(PairDto::from(pair)))
}

/// Pair routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/pairs/{id}/met", put(record_met))
}
