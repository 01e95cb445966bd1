//! Persistence layer: the [`MatchStore`] port and its adapters.
//!
//! The pairing controller reads group membership, availability and pair
//! history through [`MatchStore`], and writes new pairs through
//! [`MatchStore::commit_pairs`], which re-checks "this round has no pairs"
//! atomically with the insert. Two adapters are provided:
//!
//! - [`InMemoryStore`]: `tokio::sync::RwLock`-guarded tables (default).
//! - [`PostgresStore`]: `sqlx::PgPool` with a row lock per round.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{
    Availability, Group, GroupId, Member, MetOutcome, Pair, PairId, Participant, ParticipantId,
    Round, RoundId,
};
use crate::error::MatcherError;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Storage port for groups, participants, rounds and pairs.
///
/// All methods return [`MatcherError::Persistence`] on backend failure in
/// addition to the errors listed per method.
#[async_trait]
pub trait MatchStore: Send + Sync + std::fmt::Debug {
    /// Inserts a new group.
    ///
    /// # Errors
    ///
    /// [`MatcherError::Conflict`] if the name or channel is already taken.
    async fn insert_group(&self, group: Group) -> Result<Group, MatcherError>;

    /// Returns all groups ordered by name.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn list_groups(&self) -> Result<Vec<Group>, MatcherError>;

    /// Looks up a group.
    ///
    /// # Errors
    ///
    /// [`MatcherError::GroupNotFound`] if it does not exist.
    async fn group(&self, id: GroupId) -> Result<Group, MatcherError>;

    /// Inserts a new participant.
    ///
    /// # Errors
    ///
    /// [`MatcherError::Conflict`] if the handle is already taken.
    async fn insert_participant(&self, participant: Participant)
    -> Result<Participant, MatcherError>;

    /// Looks up a participant.
    ///
    /// # Errors
    ///
    /// [`MatcherError::ParticipantNotFound`] if it does not exist.
    async fn participant(&self, id: ParticipantId) -> Result<Participant, MatcherError>;

    /// Overwrites the mutable fields (intro, excludable, names) of an
    /// existing participant.
    ///
    /// # Errors
    ///
    /// [`MatcherError::ParticipantNotFound`] if it does not exist.
    async fn update_participant(&self, participant: &Participant) -> Result<(), MatcherError>;

    /// Adds a participant to a group with unknown availability. Joining a
    /// group twice is a no-op.
    ///
    /// # Errors
    ///
    /// [`MatcherError::GroupNotFound`] or
    /// [`MatcherError::ParticipantNotFound`].
    async fn add_membership(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
    ) -> Result<(), MatcherError>;

    /// Sets a member's availability for the group's current round.
    ///
    /// # Errors
    ///
    /// [`MatcherError::InvalidRequest`] if the participant is not a member.
    async fn set_availability(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
        availability: Availability,
    ) -> Result<(), MatcherError>;

    /// Resets every member of the group to [`Availability::Unknown`] and
    /// returns how many memberships were touched.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn reset_availability(&self, group_id: GroupId) -> Result<usize, MatcherError>;

    /// Snapshot of a group's members with their availability, in joining
    /// order.
    ///
    /// # Errors
    ///
    /// [`MatcherError::GroupNotFound`] if the group does not exist.
    async fn members(&self, group_id: GroupId) -> Result<Vec<Member>, MatcherError>;

    /// Inserts a new round.
    ///
    /// # Errors
    ///
    /// [`MatcherError::GroupNotFound`] if the round's group does not exist.
    async fn insert_round(&self, round: Round) -> Result<Round, MatcherError>;

    /// Looks up a round.
    ///
    /// # Errors
    ///
    /// [`MatcherError::RoundNotFound`] if it does not exist.
    async fn round(&self, id: RoundId) -> Result<Round, MatcherError>;

    /// Number of pairs persisted for a round.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn pair_count(&self, round_id: RoundId) -> Result<usize, MatcherError>;

    /// Every pair ever created, across all groups and rounds, as
    /// participant ID tuples.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn pair_history(&self) -> Result<Vec<(ParticipantId, ParticipantId)>, MatcherError>;

    /// Persists all pairs of a round, all or nothing.
    ///
    /// The "round has no pairs yet" check is evaluated under the same lock
    /// or transaction as the insert, so two concurrent commits for one
    /// round cannot both succeed.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::RoundNotFound`] if the round does not exist.
    /// - [`MatcherError::AlreadyPaired`] if the round already has pairs.
    async fn commit_pairs(
        &self,
        round_id: RoundId,
        pairs: Vec<Pair>,
    ) -> Result<Vec<Pair>, MatcherError>;

    /// Pairs of one round in creation order.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn pairs_for_round(&self, round_id: RoundId) -> Result<Vec<Pair>, MatcherError>;

    /// Looks up a pair.
    ///
    /// # Errors
    ///
    /// [`MatcherError::PairNotFound`] if it does not exist.
    async fn pair(&self, id: PairId) -> Result<Pair, MatcherError>;

    /// Records the meeting outcome of a pair and returns the updated pair.
    ///
    /// # Errors
    ///
    /// [`MatcherError::PairNotFound`] if it does not exist.
    async fn set_met(&self, id: PairId, met: MetOutcome) -> Result<Pair, MatcherError>;

    /// The participant's pair in the most recent round of the group that
    /// has one, if any.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn latest_pair_in_group(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
    ) -> Result<Option<Pair>, MatcherError>;

    /// Number of rounds opened for a group.
    async fn round_count(&self, group_id: GroupId) -> Result<usize, MatcherError>;

    /// Every pair made in a group's rounds, in commit order.
    async fn pairs_for_group(&self, group_id: GroupId) -> Result<Vec<Pair>, MatcherError>;
}
