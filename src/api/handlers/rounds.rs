//! Round handlers: inspect a round, run pairing, list pairs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{PairDto, PairingResponse, RoundDto};
use crate::app_state::AppState;
use crate::domain::RoundId;
use crate::error::{ErrorResponse, MatcherError};

/// `GET /rounds/{id}`: Get a round.
///
/// # Errors
///
/// Returns [`MatcherError::RoundNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rounds/{id}",
    tag = "Rounds",
    summary = "Get a round",
    params(
        ("id" = uuid::Uuid, Path, description = "Round UUID"),
    ),
    responses(
        (status = 200, description = "Round", body = RoundDto),
        (status = 404, description = "Round not found", body = ErrorResponse),
    )
)]
pub async fn get_round(
    State(state): State<AppState>,
    Path(id): Path<RoundId>,
) -> Result<impl IntoResponse, MatcherError> {
    let round = state.rounds.round(id).await?;
    Ok(Json(RoundDto::from(round)))
}

/// `POST /rounds/{id}/pairing`: Pair the round's available members.
///
/// # Errors
///
/// - [`MatcherError::AlreadyPaired`] (409) if the round has pairs.
/// - [`MatcherError::NoExcludableParticipant`] (422) on an odd pool with
///   nobody who may sit out.
#[utoipa::path(
    post,
    path = "/api/v1/rounds/{id}/pairing",
    tag = "Rounds",
    summary = "Run pairing",
    description = "Pairs every available member of the round's group, avoiding past partners where possible, persists the pairs and introduces each pair. A round can be paired once.",
    params(
        ("id" = uuid::Uuid, Path, description = "Round UUID"),
    ),
    responses(
        (status = 201, description = "Round paired", body = PairingResponse),
        (status = 404, description = "Round not found", body = ErrorResponse),
        (status = 409, description = "Round already paired", body = ErrorResponse),
        (status = 422, description = "Odd pool and nobody is excludable", body = ErrorResponse),
    )
)]
pub async fn run_pairing(
    State(state): State<AppState>,
    Path(id): Path<RoundId>,
) -> Result<impl IntoResponse, MatcherError> {
    let report = state.pairing.run_pairing(id).await?;
    Ok((StatusCode::CREATED, Json(PairingResponse::from(report))))
}

/// `GET /rounds/{id}/pairs`: List a round's pairs.
///
/// # Errors
///
/// Returns [`MatcherError::RoundNotFound`] if the round does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rounds/{id}/pairs",
    tag = "Rounds",
    summary = "List pairs",
    params(
        ("id" = uuid::Uuid, Path, description = "Round UUID"),
    ),
    responses(
        (status = 200, description = "Pairs of the round", body = Vec<PairDto>),
        (status = 404, description = "Round not found", body = ErrorResponse),
    )
)]
pub async fn list_pairs(
    State(state): State<AppState>,
    Path(id): Path<RoundId>,
) -> Result<impl IntoResponse, MatcherError> {
    let pairs = state.rounds.pairs_for_round(id).await?;
    Ok(Json(pairs.into_iter().map(PairDto::from).collect::<Vec<_>>()))
}

/// Round routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rounds/{id}", get(get_round))
        .route("/rounds/{id}/pairing", post(run_pairing))
        .route("/rounds/{id}/pairs", get(list_pairs))
}
