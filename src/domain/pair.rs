//! Pairs ("matches") created for a round, and their meeting outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PairId, ParticipantId, RoundId};

/// Whether the two participants of a pair reported meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetOutcome {
    /// No feedback yet.
    #[default]
    Unknown,
    /// They met.
    Met,
    /// They did not get to meet.
    NotMet,
}

impl From<Option<bool>> for MetOutcome {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unknown,
            Some(true) => Self::Met,
            Some(false) => Self::NotMet,
        }
    }
}

impl From<MetOutcome> for Option<bool> {
    fn from(value: MetOutcome) -> Self {
        match value {
            MetOutcome::Unknown => None,
            MetOutcome::Met => Some(true),
            MetOutcome::NotMet => Some(false),
        }
    }
}

/// Unordered pairing of two distinct participants for one round.
///
/// `first` and `second` carry no meaning beyond the order the pairing
/// engine emitted them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    /// Durable pair identifier.
    pub id: PairId,
    /// Round the pair belongs to.
    pub round_id: RoundId,
    /// One participant.
    pub first: ParticipantId,
    /// The other participant.
    pub second: ParticipantId,
    /// Meeting outcome, filled in after the round.
    pub met: MetOutcome,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Pair {
    /// Creates a new pair with an unknown outcome.
    #[must_use]
    pub fn new(round_id: RoundId, first: ParticipantId, second: ParticipantId) -> Self {
        Self {
            id: PairId::new(),
            round_id,
            first,
            second,
            met: MetOutcome::Unknown,
            created_at: Utc::now(),
        }
    }

    /// Returns both members.
    #[must_use]
    pub const fn members(&self) -> [ParticipantId; 2] {
        [self.first, self.second]
    }

    /// Returns `true` if `participant` is one of the two members.
    #[must_use]
    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.first == participant || self.second == participant
    }

    /// Returns the other member, or `None` if `participant` is not in
    /// this pair.
    #[must_use]
    pub fn partner_of(&self, participant: ParticipantId) -> Option<ParticipantId> {
        if self.first == participant {
            Some(self.second)
        } else if self.second == participant {
            Some(self.first)
        } else {
            None
        }
    }
}
