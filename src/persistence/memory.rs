//! In-memory [`MatchStore`] backed by a single `tokio::sync::RwLock`.
//!
//! Used when PostgreSQL persistence is disabled and in tests. All tables
//! sit behind one lock, so [`MatchStore::commit_pairs`] checks and inserts
//! under one write guard.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::MatchStore;
use crate::domain::{
    Availability, Group, GroupId, Member, MetOutcome, Pair, PairId, Participant, ParticipantId,
    Round, RoundId,
};
use crate::error::MatcherError;

#[derive(Debug, Default)]
struct Tables {
    groups: HashMap<GroupId, Group>,
    participants: HashMap<ParticipantId, Participant>,
    /// Per group, members in joining order with their availability.
    memberships: HashMap<GroupId, Vec<(ParticipantId, Availability)>>,
    rounds: HashMap<RoundId, Round>,
    /// All pairs in creation order.
    pairs: Vec<Pair>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn insert_group(&self, group: Group) -> Result<Group, MatcherError> {
        let mut tables = self.tables.write().await;
        if tables
            .groups
            .values()
            .any(|g| g.name == group.name || g.channel_id == group.channel_id)
        {
            return Err(MatcherError::Conflict(format!(
                "group name '{}' or channel '{}' already in use",
                group.name, group.channel_id
            )));
        }
        tables.memberships.entry(group.id).or_default();
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn list_groups(&self) -> Result<Vec<Group>, MatcherError> {
        let tables = self.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn group(&self, id: GroupId) -> Result<Group, MatcherError> {
        let tables = self.tables.read().await;
        tables
            .groups
            .get(&id)
            .cloned()
            .ok_or(MatcherError::GroupNotFound(id))
    }

    async fn insert_participant(
        &self,
        participant: Participant,
    ) -> Result<Participant, MatcherError> {
        let mut tables = self.tables.write().await;
        if tables
            .participants
            .values()
            .any(|p| p.handle == participant.handle)
        {
            return Err(MatcherError::Conflict(format!(
                "handle '{}' already registered",
                participant.handle
            )));
        }
        tables
            .participants
            .insert(participant.id, participant.clone());
        Ok(participant)
    }

    async fn participant(&self, id: ParticipantId) -> Result<Participant, MatcherError> {
        let tables = self.tables.read().await;
        tables
            .participants
            .get(&id)
            .cloned()
            .ok_or(MatcherError::ParticipantNotFound(id))
    }

    async fn update_participant(&self, participant: &Participant) -> Result<(), MatcherError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .participants
            .get_mut(&participant.id)
            .ok_or(MatcherError::ParticipantNotFound(participant.id))?;
        stored.given_name.clone_from(&participant.given_name);
        stored.surname.clone_from(&participant.surname);
        stored.intro.clone_from(&participant.intro);
        stored.excludable = participant.excludable;
        Ok(())
    }

    async fn add_membership(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
    ) -> Result<(), MatcherError> {
        let mut tables = self.tables.write().await;
        if !tables.participants.contains_key(&participant_id) {
            return Err(MatcherError::ParticipantNotFound(participant_id));
        }
        let members = tables
            .memberships
            .get_mut(&group_id)
            .ok_or(MatcherError::GroupNotFound(group_id))?;
        if !members.iter().any(|(id, _)| *id == participant_id) {
            members.push((participant_id, Availability::Unknown));
        }
        Ok(())
    }

    async fn set_availability(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
        availability: Availability,
    ) -> Result<(), MatcherError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .memberships
            .get_mut(&group_id)
            .and_then(|members| members.iter_mut().find(|(id, _)| *id == participant_id))
            .ok_or_else(|| {
                MatcherError::InvalidRequest(format!(
                    "participant {participant_id} is not a member of group {group_id}"
                ))
            })?;
        slot.1 = availability;
        Ok(())
    }

    async fn reset_availability(&self, group_id: GroupId) -> Result<usize, MatcherError> {
        let mut tables = self.tables.write().await;
        let Some(members) = tables.memberships.get_mut(&group_id) else {
            return Ok(0);
        };
        for (_, availability) in members.iter_mut() {
            *availability = Availability::Unknown;
        }
        Ok(members.len())
    }

    async fn members(&self, group_id: GroupId) -> Result<Vec<Member>, MatcherError> {
        let tables = self.tables.read().await;
        let members = tables
            .memberships
            .get(&group_id)
            .ok_or(MatcherError::GroupNotFound(group_id))?;
        Ok(members
            .iter()
            .filter_map(|(id, availability)| {
                tables.participants.get(id).map(|participant| Member {
                    participant: participant.clone(),
                    availability: *availability,
                })
            })
            .collect())
    }

    async fn insert_round(&self, round: Round) -> Result<Round, MatcherError> {
        let mut tables = self.tables.write().await;
        if !tables.groups.contains_key(&round.group_id) {
            return Err(MatcherError::GroupNotFound(round.group_id));
        }
        tables.rounds.insert(round.id, round.clone());
        Ok(round)
    }

    async fn round(&self, id: RoundId) -> Result<Round, MatcherError> {
        let tables = self.tables.read().await;
        tables
            .rounds
            .get(&id)
            .cloned()
            .ok_or(MatcherError::RoundNotFound(id))
    }

    async fn pair_count(&self, round_id: RoundId) -> Result<usize, MatcherError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pairs
            .iter()
            .filter(|p| p.round_id == round_id)
            .count())
    }

    async fn pair_history(&self) -> Result<Vec<(ParticipantId, ParticipantId)>, MatcherError> {
        let tables = self.tables.read().await;
        Ok(tables.pairs.iter().map(|p| (p.first, p.second)).collect())
    }

    async fn commit_pairs(
        &self,
        round_id: RoundId,
        pairs: Vec<Pair>,
    ) -> Result<Vec<Pair>, MatcherError> {
        let mut tables = self.tables.write().await;
        if !tables.rounds.contains_key(&round_id) {
            return Err(MatcherError::RoundNotFound(round_id));
        }
        if tables.pairs.iter().any(|p| p.round_id == round_id) {
            return Err(MatcherError::AlreadyPaired(round_id));
        }
        if let Some(stray) = pairs.iter().find(|p| p.round_id != round_id) {
            return Err(MatcherError::Internal(format!(
                "pair {} belongs to round {}, not {round_id}",
                stray.id, stray.round_id
            )));
        }
        tables.pairs.extend(pairs.iter().cloned());
        Ok(pairs)
    }

    async fn pairs_for_round(&self, round_id: RoundId) -> Result<Vec<Pair>, MatcherError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pairs
            .iter()
            .filter(|p| p.round_id == round_id)
            .cloned()
            .collect())
    }

    async fn pair(&self, id: PairId) -> Result<Pair, MatcherError> {
        let tables = self.tables.read().await;
        tables
            .pairs
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(MatcherError::PairNotFound(id))
    }

    async fn set_met(&self, id: PairId, met: MetOutcome) -> Result<Pair, MatcherError> {
        let mut tables = self.tables.write().await;
        let pair = tables
            .pairs
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(MatcherError::PairNotFound(id))?;
        pair.met = met;
        Ok(pair.clone())
    }

    async fn latest_pair_in_group(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
    ) -> Result<Option<Pair>, MatcherError> {
        let tables = self.tables.read().await;
        let latest = tables
            .pairs
            .iter()
            .filter(|p| p.involves(participant_id))
            .filter_map(|p| {
                tables
                    .rounds
                    .get(&p.round_id)
                    .filter(|r| r.group_id == group_id)
                    .map(|r| (r.end_date, r.created_at, p))
            })
            .max_by_key(|(end_date, created_at, _)| (*end_date, *created_at))
            .map(|(_, _, p)| p.clone());
        Ok(latest)
    }

    async fn round_count(&self, group_id: GroupId) -> Result<usize, MatcherError> {
        let tables = self.tables.read().await;
        Ok(tables
            .rounds
            .values()
            .filter(|r| r.group_id == group_id)
            .count())
    }

    async fn pairs_for_group(&self, group_id: GroupId) -> Result<Vec<Pair>, MatcherError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pairs
            .iter()
            .filter(|p| {
                tables
                    .rounds
                    .get(&p.round_id)
                    .is_some_and(|r| r.group_id == group_id)
            })
            .cloned()
            .collect())
    }
}
