//! Pairing service: runs the matching engine against one round.
//!
//! Every run follows the same ordered steps: load a snapshot (round, group,
//! members, pair history) → select eligible participants → greedy pairing
//! → optional swap repair → commit all pairs atomically → introduce each
//! committed pair exactly once. Introductions run on a spawned task, so a
//! caller that goes away after the commit does not leave pairs without a
//! delivery attempt. Notification failures are logged and counted; the
//! committed pairs stay authoritative.

use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use crate::config::MatcherConfig;
use crate::domain::{Pair, Participant, ParticipantId, RoundId};
use crate::error::MatcherError;
use crate::matching::{
    Candidate, HistoryIndex, pair_participants, repair_forced_duplicates, select_eligible,
};
use crate::notify::{Introduction, Notifier};
use crate::persistence::MatchStore;

/// Tunables for [`PairingService`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairingOptions {
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Run [`repair_forced_duplicates`] after the greedy pass.
    pub swap_repair: bool,
}

impl PairingOptions {
    /// Reads `PAIRING_SEED` and `PAIRING_SWAP_REPAIR` settings.
    #[must_use]
    pub const fn from_config(config: &MatcherConfig) -> Self {
        Self {
            seed: config.pairing_seed,
            swap_repair: config.swap_repair,
        }
    }
}

/// Outcome of one pairing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingReport {
    /// Round that was paired.
    pub round_id: RoundId,
    /// Committed pairs in engine order.
    pub pairs: Vec<Pair>,
    /// Participant left out because the available count was odd.
    pub excluded: Option<ParticipantId>,
    /// Pairs of people who had already met, after repair.
    pub forced_duplicates: usize,
    /// Repeats removed by swap repair.
    pub repaired_duplicates: usize,
    /// Introductions the notifier failed to deliver.
    pub notifications_failed: usize,
}

/// Orchestrates one pairing run per round.
///
/// Store and notifier are injected so tests can run against
/// [`crate::persistence::InMemoryStore`] and
/// [`crate::notify::RecordingNotifier`].
#[derive(Debug)]
pub struct PairingService {
    store: Arc<dyn MatchStore>,
    notifier: Arc<dyn Notifier>,
    rng: Mutex<StdRng>,
    swap_repair: bool,
}

impl PairingService {
    /// Creates a new `PairingService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn MatchStore>,
        notifier: Arc<dyn Notifier>,
        options: PairingOptions,
    ) -> Self {
        let rng = options
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            store,
            notifier,
            rng: Mutex::new(rng),
            swap_repair: options.swap_repair,
        }
    }

    /// Pairs the available members of the round's group and introduces
    /// every new pair.
    ///
    /// Introductions run on a spawned task once the pairs are committed;
    /// dropping the returned future after that point does not cancel them.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::RoundNotFound`] if the round does not exist.
    /// - [`MatcherError::AlreadyPaired`] if the round already has pairs,
    ///   including when a concurrent run committed first.
    /// - [`MatcherError::NoExcludableParticipant`] if the available count is
    ///   odd and nobody may be left out.
    ///
    /// No pair is written when an error is returned.
    pub async fn run_pairing(&self, round_id: RoundId) -> Result<PairingReport, MatcherError> {
        let round = self.store.round(round_id).await?;
        let group = self.store.group(round.group_id).await?;
        let existing = self.store.pair_count(round_id).await?;
        let members = self.store.members(group.id).await?;
        let candidates: Vec<Candidate> = members.iter().map(Candidate::from).collect();

        let eligibility = {
            let mut rng = self.rng.lock().await;
            select_eligible(round_id, &candidates, existing, &mut *rng)?
        };

        let history = HistoryIndex::from_pairs(self.store.pair_history().await?);
        let mut proposed = pair_participants(&eligibility.ordered, &history)?;
        let repaired_duplicates = if self.swap_repair {
            repair_forced_duplicates(&mut proposed, &history)
        } else {
            0
        };
        let forced_duplicates = proposed.iter().filter(|p| p.duplicate).count();

        let pairs: Vec<Pair> = proposed
            .iter()
            .map(|p| Pair::new(round_id, p.first, p.second))
            .collect();
        let pairs = self.store.commit_pairs(round_id, pairs).await?;

        tracing::info!(
            %round_id,
            group_id = %group.id,
            members = members.len(),
            paired = eligibility.ordered.len(),
            pairs = pairs.len(),
            forced_duplicates,
            repaired_duplicates,
            "round paired"
        );

        let profiles: HashMap<ParticipantId, &Participant> = members
            .iter()
            .map(|m| (m.participant.id, &m.participant))
            .collect();
        let mut notifications_failed = 0;
        let mut intros = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            let (Some(&first), Some(&second)) =
                (profiles.get(&pair.first), profiles.get(&pair.second))
            else {
                tracing::error!(pair_id = %pair.id, "pair member missing from snapshot");
                notifications_failed += 1;
                continue;
            };
            intros.push(Introduction {
                pair_id: pair.id,
                round_id,
                group_name: group.name.clone(),
                first: first.clone(),
                second: second.clone(),
            });
        }

        // The dispatch task is detached from this future: dropping the
        // request after the commit must not stop the introductions.
        let pending = intros.len();
        let dispatch = tokio::spawn(introduce_all(Arc::clone(&self.notifier), intros));
        notifications_failed += match dispatch.await {
            Ok(failed) => failed,
            Err(e) => {
                tracing::error!(%round_id, error = %e, "introduction dispatch failed");
                pending
            }
        };

        Ok(PairingReport {
            round_id,
            pairs,
            excluded: eligibility.excluded,
            forced_duplicates,
            repaired_duplicates,
            notifications_failed,
        })
    }
}

/// Introduces every pair in order and returns how many deliveries failed.
async fn introduce_all(notifier: Arc<dyn Notifier>, intros: Vec<Introduction>) -> usize {
    let mut failed = 0;
    for intro in &intros {
        if let Err(e) = notifier.introduce(intro).await {
            tracing::error!(pair_id = %intro.pair_id, error = %e, "introduction not delivered");
            failed += 1;
        }
    }
    failed
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Availability, Group, Round};
    use crate::notify::{Notification, RecordingNotifier};
    use crate::persistence::InMemoryStore;

    struct Fixture {
        store: Arc<InMemoryStore>,
        notifier: Arc<RecordingNotifier>,
        service: PairingService,
        group: Group,
        people: Vec<Participant>,
    }

    /// Group with `available` available members, the last `excludable` of
    /// which may be left out, plus one member who said no.
    async fn fixture(available: usize, excludable: usize) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let Ok(group) = store.insert_group(Group::new("coffee", "C001")).await else {
            panic!("group insert failed");
        };

        let mut people = Vec::new();
        for i in 0..=available {
            let mut p = Participant::new(format!("user{i}"), format!("User{i}"), "Test");
            p.excludable = i >= available.saturating_sub(excludable) && i < available;
            let Ok(p) = store.insert_participant(p).await else {
                panic!("participant insert failed");
            };
            let availability = if i < available {
                Availability::Available
            } else {
                Availability::Unavailable
            };
            let _ = store.add_membership(p.id, group.id).await;
            let _ = store.set_availability(p.id, group.id, availability).await;
            if i < available {
                people.push(p);
            }
        }

        let service = PairingService::new(
            Arc::clone(&store) as Arc<dyn MatchStore>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            PairingOptions {
                seed: Some(7),
                swap_repair: false,
            },
        );
        Fixture {
            store,
            notifier,
            service,
            group,
            people,
        }
    }

    async fn open_round(f: &Fixture, day: u32) -> RoundId {
        let start = NaiveDate::from_ymd_opt(2026, 1, day).unwrap_or_default();
        let Ok(round) = f.store.insert_round(Round::new(f.group.id, start, 4)).await else {
            panic!("round insert failed");
        };
        round.id
    }

    #[tokio::test]
    async fn even_pool_pairs_everyone_once() {
        let f = fixture(6, 0).await;
        let round_id = open_round(&f, 5).await;

        let Ok(report) = f.service.run_pairing(round_id).await else {
            panic!("pairing failed");
        };
        assert_eq!(report.pairs.len(), 3);
        assert_eq!(report.excluded, None);
        assert_eq!(report.notifications_failed, 0);

        let paired: HashSet<ParticipantId> =
            report.pairs.iter().flat_map(Pair::members).collect();
        let expected: HashSet<ParticipantId> = f.people.iter().map(|p| p.id).collect();
        assert_eq!(paired, expected);
    }

    #[tokio::test]
    async fn rerun_is_rejected_and_leaves_pairs_alone() {
        let f = fixture(4, 0).await;
        let round_id = open_round(&f, 5).await;
        let Ok(first) = f.service.run_pairing(round_id).await else {
            panic!("pairing failed");
        };

        let second = f.service.run_pairing(round_id).await;
        assert!(matches!(second, Err(MatcherError::AlreadyPaired(id)) if id == round_id));

        let Ok(stored) = f.store.pairs_for_round(round_id).await else {
            panic!("pairs missing");
        };
        assert_eq!(stored, first.pairs);
        assert_eq!(f.notifier.introduced_pairs().await.len(), 2);
    }

    #[tokio::test]
    async fn odd_pool_without_excludable_writes_nothing() {
        let f = fixture(5, 0).await;
        let round_id = open_round(&f, 5).await;

        let result = f.service.run_pairing(round_id).await;
        assert!(matches!(
            result,
            Err(MatcherError::NoExcludableParticipant { available: 5, .. })
        ));
        assert_eq!(f.store.pair_count(round_id).await.ok(), Some(0));
        assert_eq!(f.notifier.attempts(), 0);
    }

    #[tokio::test]
    async fn odd_pool_excludes_an_excludable_member() {
        let f = fixture(5, 2).await;
        let round_id = open_round(&f, 5).await;

        let Ok(report) = f.service.run_pairing(round_id).await else {
            panic!("pairing failed");
        };
        let Some(excluded) = report.excluded else {
            panic!("nobody excluded");
        };
        let excludable: HashSet<ParticipantId> = f
            .people
            .iter()
            .filter(|p| p.excludable)
            .map(|p| p.id)
            .collect();
        assert!(excludable.contains(&excluded));
        assert_eq!(report.pairs.len(), 2);
        assert!(report.pairs.iter().all(|p| !p.involves(excluded)));
    }

    #[tokio::test]
    async fn each_pair_is_introduced_exactly_once() {
        let f = fixture(8, 0).await;
        let round_id = open_round(&f, 5).await;
        let Ok(report) = f.service.run_pairing(round_id).await else {
            panic!("pairing failed");
        };

        let introduced = f.notifier.introduced_pairs().await;
        let expected: Vec<_> = report.pairs.iter().map(|p| p.id).collect();
        assert_eq!(introduced, expected);

        for notification in f.notifier.delivered().await {
            let Notification::Introduction { pair_id, members } = notification else {
                panic!("unexpected notification");
            };
            let Some(pair) = report.pairs.iter().find(|p| p.id == pair_id) else {
                panic!("introduction for unknown pair");
            };
            assert_eq!(members, pair.members());
        }
    }

    #[tokio::test]
    async fn later_rounds_avoid_earlier_partners() {
        let f = fixture(4, 0).await;
        let first_round = open_round(&f, 5).await;
        let Ok(first) = f.service.run_pairing(first_round).await else {
            panic!("pairing failed");
        };

        let second_round = open_round(&f, 12).await;
        let Ok(second) = f.service.run_pairing(second_round).await else {
            panic!("pairing failed");
        };
        assert_eq!(second.forced_duplicates, 0);

        let history = HistoryIndex::from_pairs(first.pairs.iter().map(|p| (p.first, p.second)));
        for pair in &second.pairs {
            assert!(!history.have_met(pair.first, pair.second));
            assert!(!history.have_met(pair.second, pair.first));
        }
    }

    #[tokio::test]
    async fn failed_introduction_does_not_undo_pairing() {
        let f = fixture(6, 0).await;
        f.notifier.fail_next(1);
        let round_id = open_round(&f, 5).await;

        let Ok(report) = f.service.run_pairing(round_id).await else {
            panic!("pairing failed");
        };
        assert_eq!(report.notifications_failed, 1);
        assert_eq!(f.store.pair_count(round_id).await.ok(), Some(3));
        assert_eq!(f.notifier.attempts(), 3);
        assert_eq!(f.notifier.introduced_pairs().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_run_still_introduces_every_committed_pair() {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::with_delay(Duration::from_millis(100)));
        let Ok(group) = store.insert_group(Group::new("coffee", "C001")).await else {
            panic!("group insert failed");
        };
        for i in 0..6 {
            let p = Participant::new(format!("user{i}"), format!("User{i}"), "Test");
            let Ok(p) = store.insert_participant(p).await else {
                panic!("participant insert failed");
            };
            let _ = store.add_membership(p.id, group.id).await;
            let _ = store
                .set_availability(p.id, group.id, Availability::Available)
                .await;
        }
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default();
        let Ok(round) = store.insert_round(Round::new(group.id, start, 4)).await else {
            panic!("round insert failed");
        };
        let round_id = round.id;
        let service = Arc::new(PairingService::new(
            Arc::clone(&store) as Arc<dyn MatchStore>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            PairingOptions {
                seed: Some(7),
                swap_repair: false,
            },
        ));

        let runner = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.run_pairing(round_id).await })
        };
        tokio::time::sleep(Duration::from_millis(150)).await;
        runner.abort();
        let Err(cancelled) = runner.await else {
            panic!("run finished before it was cancelled");
        };
        assert!(cancelled.is_cancelled());

        tokio::time::sleep(Duration::from_secs(1)).await;
        let Ok(committed) = store.pairs_for_round(round_id).await else {
            panic!("pairs missing");
        };
        assert_eq!(committed.len(), 3);
        let introduced = notifier.introduced_pairs().await;
        let expected: Vec<_> = committed.iter().map(|p| p.id).collect();
        assert_eq!(introduced, expected);
        assert_eq!(notifier.attempts(), 3);
    }

    #[tokio::test]
    async fn concurrent_runs_commit_once() {
        let f = fixture(6, 0).await;
        let round_id = open_round(&f, 5).await;

        let (a, b) = tokio::join!(
            f.service.run_pairing(round_id),
            f.service.run_pairing(round_id)
        );
        let ok = [&a, &b].iter().filter(|r| r.is_ok()).count();
        let rejected = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(MatcherError::AlreadyPaired(_))))
            .count();
        assert_eq!((ok, rejected), (1, 1));
        assert_eq!(f.store.pair_count(round_id).await.ok(), Some(3));
        assert_eq!(f.notifier.introduced_pairs().await.len(), 3);
    }

    #[tokio::test]
    async fn unknown_round_is_not_found() {
        let f = fixture(2, 0).await;
        let missing = RoundId::new();
        assert!(matches!(
            f.service.run_pairing(missing).await,
            Err(MatcherError::RoundNotFound(id)) if id == missing
        ));
    }
}
