//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    CreateGroupRequest, GroupDto, GroupStatsDto, LeaderboardEntryDto, OpenRoundRequest,
    OpenRoundResponse, PairDto, PairingResponse, ParticipantDto, RecordMetRequest,
    RegisterParticipantRequest, RoundDto, SetAvailabilityRequest, SetExcludableRequest,
    UpdateIntroRequest,
};
use super::handlers::{groups, pairs, participants, rounds, system};
use crate::domain::{Availability, GroupId, MetOutcome, PairId, ParticipantId, RoundId};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated API description served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "pool-matcher",
        description = "History-aware one-on-one pairing for chat groups"
    ),
    paths(
        groups::create_group,
        groups::list_groups,
        groups::open_round,
        groups::group_stats,
        participants::register_participant,
        participants::get_participant,
        participants::join_group,
        participants::set_availability,
        participants::update_intro,
        participants::set_excludable,
        rounds::get_round,
        rounds::run_pairing,
        rounds::list_pairs,
        pairs::record_met,
        system::health_handler,
    ),
    components(schemas(
        Availability,
        CreateGroupRequest,
        ErrorBody,
        ErrorResponse,
        GroupDto,
        GroupId,
        GroupStatsDto,
        LeaderboardEntryDto,
        MetOutcome,
        OpenRoundRequest,
        OpenRoundResponse,
        PairDto,
        PairId,
        PairingResponse,
        ParticipantDto,
        ParticipantId,
        RecordMetRequest,
        RegisterParticipantRequest,
        RoundDto,
        RoundId,
        SetAvailabilityRequest,
        SetExcludableRequest,
        UpdateIntroRequest,
        system::HealthResponse,
    )),
    tags(
        (name = "Groups", description = "Groups and rounds"),
        (name = "Participants", description = "Profiles, membership and availability"),
        (name = "Rounds", description = "Pairing runs"),
        (name = "Pairs", description = "Meeting outcomes"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;
