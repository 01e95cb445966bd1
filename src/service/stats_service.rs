//! Stats service: per-group participation figures and a meetup leaderboard.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Group, GroupId, Member, MetOutcome, Pair, Participant, ParticipantId};
use crate::error::MatcherError;
use crate::persistence::MatchStore;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// Dense rank; members with the same count share it.
    pub rank: usize,
    /// The member.
    pub participant: Participant,
    /// Pairs this member reported as met.
    pub people_met: usize,
}

/// Aggregate figures for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    /// The group.
    pub group: Group,
    /// Current members.
    pub participants: usize,
    /// Rounds opened.
    pub rounds: usize,
    /// Pairs made across all rounds.
    pub pairs: usize,
    /// Pairs reported as met.
    pub met: usize,
    /// Pairs reported as not met.
    pub not_met: usize,
    /// Rounded share of pairs that met, in percent. `None` before any pair.
    pub meetup_rate: Option<usize>,
    /// Rounded number of people paired per round. `None` before any round.
    pub average_round_size: Option<usize>,
    /// Members by meetups, most first; ties keep joining order.
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl GroupStats {
    /// Computes the figures from a group snapshot.
    #[must_use]
    pub fn compute(group: Group, members: &[Member], rounds: usize, pairs: &[Pair]) -> Self {
        let met = pairs.iter().filter(|p| p.met == MetOutcome::Met).count();
        let not_met = pairs.iter().filter(|p| p.met == MetOutcome::NotMet).count();

        let mut met_counts: HashMap<ParticipantId, usize> = HashMap::new();
        for pair in pairs.iter().filter(|p| p.met == MetOutcome::Met) {
            for id in pair.members() {
                *met_counts.entry(id).or_default() += 1;
            }
        }

        let mut ranked: Vec<(&Participant, usize)> = members
            .iter()
            .map(|m| {
                let count = met_counts.get(&m.participant.id).copied().unwrap_or(0);
                (&m.participant, count)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let mut leaderboard = Vec::with_capacity(ranked.len());
        let mut rank = 0;
        let mut previous = None;
        for (participant, people_met) in ranked {
            if previous != Some(people_met) {
                rank += 1;
                previous = Some(people_met);
            }
            leaderboard.push(LeaderboardEntry {
                rank,
                participant: participant.clone(),
                people_met,
            });
        }

        Self {
            group,
            participants: members.len(),
            rounds,
            pairs: pairs.len(),
            met,
            not_met,
            meetup_rate: rounded_ratio(met * 100, pairs.len()),
            average_round_size: rounded_ratio(pairs.len() * 2, rounds),
            leaderboard,
        }
    }
}

/// `numerator / denominator` rounded half up; `None` for a zero denominator.
fn rounded_ratio(numerator: usize, denominator: usize) -> Option<usize> {
    (denominator > 0).then(|| (numerator + denominator / 2) / denominator)
}

/// Read-only reporting over the store.
#[derive(Debug, Clone)]
pub struct StatsService {
    store: Arc<dyn MatchStore>,
}

impl StatsService {
    /// Creates a new `StatsService`.
    #[must_use]
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Figures for one group.
    ///
    /// # Errors
    ///
    /// [`MatcherError::GroupNotFound`] if the group does not exist.
    pub async fn group_stats(&self, group_id: GroupId) -> Result<GroupStats, MatcherError> {
        let group = self.store.group(group_id).await?;
        let members = self.store.members(group_id).await?;
        let rounds = self.store.round_count(group_id).await?;
        let pairs = self.store.pairs_for_group(group_id).await?;
        Ok(GroupStats::compute(group, &members, rounds, &pairs))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Availability, Round, RoundId};
    use crate::persistence::InMemoryStore;

    fn member(handle: &str) -> Member {
        Member {
            participant: Participant::new(handle, handle, "Test"),
            availability: Availability::Unknown,
        }
    }

    fn pair(round_id: RoundId, a: &Member, b: &Member, met: MetOutcome) -> Pair {
        let mut pair = Pair::new(round_id, a.participant.id, b.participant.id);
        pair.met = met;
        pair
    }

    #[test]
    fn empty_group_has_no_rates() {
        let stats = GroupStats::compute(Group::new("coffee", "C001"), &[member("ada")], 0, &[]);
        assert_eq!(stats.participants, 1);
        assert_eq!(stats.meetup_rate, None);
        assert_eq!(stats.average_round_size, None);
        assert_eq!(stats.leaderboard.len(), 1);
        assert_eq!(stats.leaderboard.first().map(|e| e.rank), Some(1));
    }

    #[test]
    fn leaderboard_uses_dense_ranks() {
        let members: Vec<Member> = ["ada", "brian", "cleo", "dev"].map(member).into();
        let [ada, brian, cleo, dev] = members.as_slice() else {
            panic!("four members expected");
        };
        let first = RoundId::new();
        let second = RoundId::new();
        let third = RoundId::new();
        let pairs = vec![
            pair(first, ada, brian, MetOutcome::Met),
            pair(first, cleo, dev, MetOutcome::NotMet),
            pair(second, ada, cleo, MetOutcome::Met),
            pair(second, brian, dev, MetOutcome::Unknown),
            pair(third, ada, dev, MetOutcome::Met),
        ];

        let stats = GroupStats::compute(Group::new("coffee", "C001"), &members, 3, &pairs);
        assert_eq!((stats.pairs, stats.met, stats.not_met), (5, 3, 1));
        assert_eq!(stats.meetup_rate, Some(60));
        assert_eq!(stats.average_round_size, Some(3));

        let rows: Vec<(usize, &str, usize)> = stats
            .leaderboard
            .iter()
            .map(|e| (e.rank, e.participant.handle.as_str(), e.people_met))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, "ada", 3),
                (2, "brian", 1),
                (2, "cleo", 1),
                (2, "dev", 1),
            ]
        );
    }

    #[tokio::test]
    async fn service_reads_one_group() {
        let store = Arc::new(InMemoryStore::new());
        let service = StatsService::new(Arc::clone(&store) as Arc<dyn MatchStore>);
        let Ok(group) = store.insert_group(Group::new("coffee", "C001")).await else {
            panic!("group insert failed");
        };
        let mut ids = Vec::new();
        for handle in ["ada", "brian"] {
            let Ok(p) = store
                .insert_participant(Participant::new(handle, handle, "Test"))
                .await
            else {
                panic!("participant insert failed");
            };
            let _ = store.add_membership(p.id, group.id).await;
            ids.push(p.id);
        }
        let [ada, brian] = ids.as_slice() else {
            panic!("two participants expected");
        };
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default();
        let Ok(round) = store.insert_round(Round::new(group.id, start, 4)).await else {
            panic!("round insert failed");
        };
        let made = Pair::new(round.id, *ada, *brian);
        let _ = store.commit_pairs(round.id, vec![made.clone()]).await;
        let _ = store.set_met(made.id, MetOutcome::Met).await;

        let Ok(stats) = service.group_stats(group.id).await else {
            panic!("stats failed");
        };
        assert_eq!((stats.participants, stats.rounds, stats.pairs), (2, 1, 1));
        assert_eq!(stats.meetup_rate, Some(100));
        assert!(stats.leaderboard.iter().all(|e| e.rank == 1 && e.people_met == 1));

        assert!(matches!(
            service.group_stats(GroupId::new()).await,
            Err(MatcherError::GroupNotFound(_))
        ));
    }
}
