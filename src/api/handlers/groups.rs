//! Group handlers: create, list, open a round, report stats.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreateGroupRequest, GroupDto, GroupStatsDto, OpenRoundRequest, OpenRoundResponse,
};
use crate::app_state::AppState;
use crate::domain::GroupId;
use crate::error::{ErrorResponse, MatcherError};

/// `POST /groups`: Create a group.
///
/// # Errors
///
/// Returns [`MatcherError`] on an invalid name or a name/channel conflict.
#[utoipa::path(
    post,
    path = "/api/v1/groups",
    tag = "Groups",
    summary = "Create a group",
    description = "Creates a named pool of participants bound to one chat channel.",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupDto),
        (status = 400, description = "Invalid name or channel", body = ErrorResponse),
        (status = 409, description = "Name or channel already in use", body = ErrorResponse),
    )
)]
pub async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, MatcherError> {
    let group = state
        .directory
        .create_group(&req.name, &req.channel_id)
        .await?;
    Ok((StatusCode::CREATED, Json(GroupDto::from(group))))
}

/// `GET /groups`: List all groups.
///
/// # Errors
///
/// Returns [`MatcherError`] on persistence failure.
#[utoipa::path(
    get,
    path = "/api/v1/groups",
    tag = "Groups",
    summary = "List groups",
    description = "Returns every group ordered by name.",
    responses(
        (status = 200, description = "All groups", body = Vec<GroupDto>),
    )
)]
pub async fn list_groups(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MatcherError> {
    let groups = state.directory.list_groups().await?;
    Ok(Json(
        groups.into_iter().map(GroupDto::from).collect::<Vec<_>>(),
    ))
}

/// `POST /groups/{id}/rounds`: Open a new round.
///
/// # Errors
///
/// Returns [`MatcherError::GroupNotFound`] if the group does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/rounds",
    tag = "Groups",
    summary = "Open a round",
    description = "Creates a round, resets every member's availability to unknown, asks each member whether they want to take part and follows up on undecided pairs from the previous round.",
    params(
        ("id" = uuid::Uuid, Path, description = "Group UUID"),
    ),
    request_body(content = OpenRoundRequest, description = "Optional; omit the body to start today"),
    responses(
        (status = 201, description = "Round opened", body = OpenRoundResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
    )
)]
pub async fn open_round(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    req: Option<Json<OpenRoundRequest>>,
) -> Result<impl IntoResponse, MatcherError> {
    let Json(req) = req.unwrap_or_default();
    let opened = state.rounds.open_round(group_id, req.start_date).await?;
    Ok((StatusCode::CREATED, Json(OpenRoundResponse::from(opened))))
}

/// `GET /groups/{id}/stats`: Meetup figures and leaderboard.
///
/// # Errors
///
/// Returns [`MatcherError::GroupNotFound`] if the group does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/stats",
    tag = "Groups",
    summary = "Group statistics",
    description = "Counts members, rounds and pairs, the share of pairs that met, and ranks members by how many people they have met.",
    params(
        ("id" = uuid::Uuid, Path, description = "Group UUID"),
    ),
    responses(
        (status = 200, description = "Group statistics", body = GroupStatsDto),
        (status = 404, description = "Group not found", body = ErrorResponse),
    )
)]
pub async fn group_stats(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> Result<impl IntoResponse, MatcherError> {
    let stats = state.stats.group_stats(group_id).await?;
    Ok(Json(GroupStatsDto::from(stats)))
}

/// Group routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", post(create_group).get(list_groups))
        .route("/groups/{id}/rounds", post(open_round))
        .route("/groups/{id}/stats", get(group_stats))
}
