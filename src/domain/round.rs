//! Rounds: one scheduled pairing cycle of a group.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{GroupId, RoundId};

/// Default round length: a Monday start ends on the Friday.
pub const DEFAULT_ROUND_LENGTH_DAYS: u32 = 5;

/// One pairing cycle of a group.
///
/// A round is paired at most once; see
/// [`crate::error::MatcherError::AlreadyPaired`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Unique round identifier.
    pub id: RoundId,
    /// Group this round belongs to.
    pub group_id: GroupId,
    /// First day of the round.
    pub start_date: NaiveDate,
    /// Last day of the round.
    pub end_date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Round {
    /// Creates a round starting on `start_date` and ending `length_days`
    /// later. Saturates at the last representable date.
    #[must_use]
    pub fn new(group_id: GroupId, start_date: NaiveDate, length_days: u32) -> Self {
        let end_date = start_date
            .checked_add_days(Days::new(u64::from(length_days)))
            .unwrap_or(NaiveDate::MAX);
        Self {
            id: RoundId::new(),
            group_id,
            start_date,
            end_date,
            created_at: Utc::now(),
        }
    }
}
