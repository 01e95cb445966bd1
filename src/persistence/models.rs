//! Database row models and their conversion into domain records.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Availability, Group, Member, Pair, Participant, Round};

/// A row from the `groups` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRow {
    /// Group ID.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Unique chat channel.
    pub channel_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            channel_id: row.channel_id,
            created_at: row.created_at,
        }
    }
}

/// A row from the `participants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    /// Participant ID.
    pub id: Uuid,
    /// Unique chat handle.
    pub handle: String,
    /// First name.
    pub given_name: String,
    /// Last name.
    pub surname: String,
    /// Self-introduction.
    pub intro: String,
    /// Whether the participant may be left out on odd counts.
    pub excludable: bool,
    /// First-seen timestamp.
    pub joined_at: DateTime<Utc>,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Self {
            id: row.id.into(),
            handle: row.handle,
            given_name: row.given_name,
            surname: row.surname,
            intro: row.intro,
            excludable: row.excludable,
            joined_at: row.joined_at,
        }
    }
}

/// A participant row joined with its `memberships.availability` column.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberRow {
    /// Participant columns.
    #[sqlx(flatten)]
    pub participant: ParticipantRow,
    /// Availability stored as text.
    pub availability: String,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Self {
            participant: row.participant.into(),
            availability: Availability::from_db(&row.availability),
        }
    }
}

/// A row from the `rounds` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoundRow {
    /// Round ID.
    pub id: Uuid,
    /// Owning group.
    pub group_id: Uuid,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<RoundRow> for Round {
    fn from(row: RoundRow) -> Self {
        Self {
            id: row.id.into(),
            group_id: row.group_id.into(),
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
        }
    }
}

/// A row from the `pairs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PairRow {
    /// Pair ID.
    pub id: Uuid,
    /// Owning round.
    pub round_id: Uuid,
    /// One participant.
    pub first_id: Uuid,
    /// The other participant.
    pub second_id: Uuid,
    /// Meeting outcome; `NULL` while unknown.
    pub met: Option<bool>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<PairRow> for Pair {
    fn from(row: PairRow) -> Self {
        Self {
            id: row.id.into(),
            round_id: row.round_id.into(),
            first: row.first_id.into(),
            second: row.second_id.into(),
            met: row.met.into(),
            created_at: row.created_at,
        }
    }
}
