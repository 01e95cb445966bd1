//! Group DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Group, GroupId, ParticipantId};
use crate::service::{GroupStats, LeaderboardEntry};

/// Request body for `POST /groups`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    /// Unique group name (max 64 chars).
    pub name: String,
    /// Chat channel the group lives in.
    pub channel_id: String,
}

/// A group as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupDto {
    /// Group identifier.
    pub group_id: GroupId,
    /// Group name.
    pub name: String,
    /// Chat channel.
    pub channel_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Group> for GroupDto {
    fn from(group: Group) -> Self {
        Self {
            group_id: group.id,
            name: group.name,
            channel_id: group.channel_id,
            created_at: group.created_at,
        }
    }
}

/// One leaderboard row in [`GroupStatsDto`].
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntryDto {
    /// Dense rank, starting at 1.
    pub rank: usize,
    /// Member.
    pub participant_id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Meetups reported as happened.
    pub people_met: usize,
}

impl From<LeaderboardEntry> for LeaderboardEntryDto {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            participant_id: entry.participant.id,
            name: entry.participant.display_name(),
            people_met: entry.people_met,
        }
    }
}

/// Response for `GET /groups/{id}/stats`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupStatsDto {
    /// Group identifier.
    pub group_id: GroupId,
    /// Group name.
    pub name: String,
    /// Current members.
    pub participant_count: usize,
    /// Rounds opened.
    pub round_count: usize,
    /// Pairs made.
    pub pair_count: usize,
    /// Pairs that met.
    pub met_count: usize,
    /// Pairs that did not meet.
    pub not_met_count: usize,
    /// Percent of pairs that met; `null` before the first pair.
    pub meetup_rate: Option<usize>,
    /// People paired per round; `null` before the first round.
    pub average_round_size: Option<usize>,
    /// Members by meetups.
    pub leaderboard: Vec<LeaderboardEntryDto>,
}

impl From<GroupStats> for GroupStatsDto {
    fn from(stats: GroupStats) -> Self {
        Self {
            group_id: stats.group.id,
            name: stats.group.name,
            participant_count: stats.participants,
            round_count: stats.rounds,
            pair_count: stats.pairs,
            met_count: stats.met,
            not_met_count: stats.not_met,
            meetup_rate: stats.meetup_rate,
            average_round_size: stats.average_round_size,
            leaderboard: stats
                .leaderboard
                .into_iter()
                .map(LeaderboardEntryDto::from)
                .collect(),
        }
    }
}
