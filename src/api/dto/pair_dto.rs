//! Pair DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{MetOutcome, Pair, PairId, ParticipantId, RoundId};

/// A pair as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PairDto {
    /// Pair identifier.
    pub pair_id: PairId,
    /// Round the pair belongs to.
    pub round_id: RoundId,
    /// One member.
    pub first: ParticipantId,
    /// The other member.
    pub second: ParticipantId,
    /// Whether the two met.
    pub met: MetOutcome,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Pair> for PairDto {
    fn from(pair: Pair) -> Self {
        Self {
            pair_id: pair.id,
            round_id: pair.round_id,
            first: pair.first,
            second: pair.second,
            met: pair.met,
            created_at: pair.created_at,
        }
    }
}

/// Request body for `PUT /pairs/{id}/met`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordMetRequest {
    /// Meeting outcome.
    pub met: MetOutcome,
}
