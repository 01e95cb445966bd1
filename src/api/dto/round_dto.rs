//! Round and pairing-run DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PairDto;
use crate::domain::{GroupId, ParticipantId, Round, RoundId};
use crate::service::{PairingReport, RoundOpened};

/// Optional request body for `POST /groups/{id}/rounds`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OpenRoundRequest {
    /// First day of the round; defaults to today (UTC).
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// A round as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoundDto {
    /// Round identifier.
    pub round_id: RoundId,
    /// Owning group.
    pub group_id: GroupId,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Round> for RoundDto {
    fn from(round: Round) -> Self {
        Self {
            round_id: round.id,
            group_id: round.group_id,
            start_date: round.start_date,
            end_date: round.end_date,
            created_at: round.created_at,
        }
    }
}

/// Response body for `POST /groups/{id}/rounds` (201 Created).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OpenRoundResponse {
    /// The new round.
    pub round: RoundDto,
    /// Availability requests delivered.
    pub availability_requests: usize,
    /// Meeting follow-ups delivered.
    pub met_follow_ups: usize,
    /// Messages that could not be delivered.
    pub notifications_failed: usize,
}

impl From<RoundOpened> for OpenRoundResponse {
    fn from(opened: RoundOpened) -> Self {
        Self {
            round: opened.round.into(),
            availability_requests: opened.availability_requests,
            met_follow_ups: opened.met_follow_ups,
            notifications_failed: opened.notifications_failed,
        }
    }
}

/// Response body for `POST /rounds/{id}/pairing` (201 Created).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PairingResponse {
    /// Round that was paired.
    pub round_id: RoundId,
    /// Created pairs.
    pub pairs: Vec<PairDto>,
    /// Member left out because the available count was odd.
    pub excluded: Option<ParticipantId>,
    /// Pairs of people who had been paired before.
    pub forced_duplicates: usize,
    /// Repeats removed by swap repair.
    pub repaired_duplicates: usize,
    /// Introductions that could not be delivered.
    pub notifications_failed: usize,
}

impl From<PairingReport> for PairingResponse {
    fn from(report: PairingReport) -> Self {
        Self {
            round_id: report.round_id,
            pairs: report.pairs.into_iter().map(PairDto::from).collect(),
            excluded: report.excluded,
            forced_duplicates: report.forced_duplicates,
            repaired_duplicates: report.repaired_duplicates,
            notifications_failed: report.notifications_failed,
        }
    }
}
