//! Participant handlers: registration, membership and profile updates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::dto::{
    ParticipantDto, RegisterParticipantRequest, SetAvailabilityRequest, SetExcludableRequest,
    UpdateIntroRequest,
};
use crate::app_state::AppState;
use crate::domain::{GroupId, ParticipantId};
use crate::error::{ErrorResponse, MatcherError};

/// `POST /participants`: Register a participant.
///
/// # Errors
///
/// Returns [`MatcherError`] on invalid input, an unknown group or a taken
/// handle.
#[utoipa::path(
    post,
    path = "/api/v1/participants",
    tag = "Participants",
    summary = "Register a participant",
    description = "Creates a participant profile and optionally adds it to groups.",
    request_body = RegisterParticipantRequest,
    responses(
        (status = 201, description = "Participant registered", body = ParticipantDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "Handle already registered", body = ErrorResponse),
    )
)]
pub async fn register_participant(
    State(state): State<AppState>,
    Json(req): Json<RegisterParticipantRequest>,
) -> Result<impl IntoResponse, MatcherError> {
    let (new, group_ids) = req.into_parts();
    let participant = state
        .directory
        .register_participant(new, &group_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(ParticipantDto::from(participant))))
}

/// `GET /participants/{id}`: Get a participant.
///
/// # Errors
///
/// Returns [`MatcherError::ParticipantNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/participants/{id}",
    tag = "Participants",
    summary = "Get a participant",
    params(
        ("id" = uuid::Uuid, Path, description = "Participant UUID"),
    ),
    responses(
        (status = 200, description = "Participant", body = ParticipantDto),
        (status = 404, description = "Participant not found", body = ErrorResponse),
    )
)]
pub async fn get_participant(
    State(state): State<AppState>,
    Path(id): Path<ParticipantId>,
) -> Result<impl IntoResponse, MatcherError> {
    let participant = state.directory.participant(id).await?;
    Ok(Json(ParticipantDto::from(participant)))
}

/// `PUT /participants/{id}/groups/{group_id}`: Join a group.
///
/// # Errors
///
/// Returns [`MatcherError`] if the participant or group does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/participants/{id}/groups/{group_id}",
    tag = "Participants",
    summary = "Join a group",
    description = "Adds the participant to the group. Joining twice is a no-op.",
    params(
        ("id" = uuid::Uuid, Path, description = "Participant UUID"),
        ("group_id" = uuid::Uuid, Path, description = "Group UUID"),
    ),
    responses(
        (status = 204, description = "Member of the group"),
        (status = 404, description = "Participant or group not found", body = ErrorResponse),
    )
)]
pub async fn join_group(
    State(state): State<AppState>,
    Path((id, group_id)): Path<(ParticipantId, GroupId)>,
) -> Result<impl IntoResponse, MatcherError> {
    state.directory.join_group(id, group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /participants/{id}/availability`: Answer the availability request.
///
/// # Errors
///
/// Returns [`MatcherError::InvalidRequest`] if the participant is not a
/// member of the group.
#[utoipa::path(
    put,
    path = "/api/v1/participants/{id}/availability",
    tag = "Participants",
    summary = "Set availability",
    description = "Records whether the participant wants to be paired in the group's current round.",
    params(
        ("id" = uuid::Uuid, Path, description = "Participant UUID"),
    ),
    request_body = SetAvailabilityRequest,
    responses(
        (status = 204, description = "Availability recorded"),
        (status = 400, description = "Not a member of the group", body = ErrorResponse),
    )
)]
pub async fn set_availability(
    State(state): State<AppState>,
    Path(id): Path<ParticipantId>,
    Json(req): Json<SetAvailabilityRequest>,
) -> Result<impl IntoResponse, MatcherError> {
    state
        .directory
        .set_availability(id, req.group_id, req.availability)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /participants/{id}/intro`: Replace the self-introduction.
///
/// # Errors
///
/// Returns [`MatcherError::ParticipantNotFound`] if it does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/participants/{id}/intro",
    tag = "Participants",
    summary = "Update intro",
    params(
        ("id" = uuid::Uuid, Path, description = "Participant UUID"),
    ),
    request_body = UpdateIntroRequest,
    responses(
        (status = 200, description = "Updated participant", body = ParticipantDto),
        (status = 404, description = "Participant not found", body = ErrorResponse),
    )
)]
pub async fn update_intro(
    State(state): State<AppState>,
    Path(id): Path<ParticipantId>,
    Json(req): Json<UpdateIntroRequest>,
) -> Result<impl IntoResponse, MatcherError> {
    let participant = state.directory.update_intro(id, req.intro).await?;
    Ok(Json(ParticipantDto::from(participant)))
}

/// `PUT /participants/{id}/excludable`: Set the excludable flag.
///
/// # Errors
///
/// Returns [`MatcherError::ParticipantNotFound`] if it does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/participants/{id}/excludable",
    tag = "Participants",
    summary = "Set excludable",
    description = "Controls whether the participant may be left out of a round with an odd number of available members.",
    params(
        ("id" = uuid::Uuid, Path, description = "Participant UUID"),
    ),
    request_body = SetExcludableRequest,
    responses(
        (status = 200, description = "Updated participant", body = ParticipantDto),
        (status = 404, description = "Participant not found", body = ErrorResponse),
    )
)]
pub async fn set_excludable(
    State(state): State<AppState>,
    Path(id): Path<ParticipantId>,
    Json(req): Json<SetExcludableRequest>,
) -> Result<impl IntoResponse, MatcherError> {
    let participant = state.directory.set_excludable(id, req.excludable).await?;
    Ok(Json(ParticipantDto::from(participant)))
}

/// Participant routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/participants", post(register_participant))
        .route("/participants/{id}", get(get_participant))
        .route("/participants/{id}/groups/{group_id}", put(join_group))
        .route("/participants/{id}/availability", put(set_availability))
        .route("/participants/{id}/intro", put(update_intro))
        .route("/participants/{id}/excludable", put(set_excludable))
}
