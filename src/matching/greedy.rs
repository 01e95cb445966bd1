//! Greedy, history-aware pairing.
//!
//! One pass over the eligible order, no backtracking. Each participant who
//! is still unclaimed takes the earliest unclaimed participant they have
//! never been paired with, or the earliest unclaimed participant at all if
//! everyone left is a repeat. A perfect repeat-free pairing may exist that
//! this pass misses; [`super::repair`] can fix some of those afterwards.
//!
//! Cost is O(N²) time and O(N) extra space on top of the history index.

use std::collections::HashSet;

use crate::domain::ParticipantId;
use crate::error::MatcherError;

use super::HistoryIndex;

/// A pair proposed by the engine, before it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedPair {
    /// The participant whose turn it was.
    pub first: ParticipantId,
    /// The partner they took.
    pub second: ParticipantId,
    /// `true` if the two had been paired before (forced duplicate).
    pub duplicate: bool,
}

/// Partitions `ordered` into pairs, walking it in order.
///
/// # Errors
///
/// Returns [`MatcherError::Internal`] if `ordered` has odd length. Callers
/// get an even-length order from [`super::select_eligible`].
pub fn pair_participants(
    ordered: &[ParticipantId],
    history: &HistoryIndex,
) -> Result<Vec<ProposedPair>, MatcherError> {
    if ordered.len() % 2 != 0 {
        return Err(MatcherError::Internal(format!(
            "cannot pair an odd number of participants ({})",
            ordered.len()
        )));
    }

    let mut claimed: HashSet<ParticipantId> = HashSet::with_capacity(ordered.len());
    let mut pairs = Vec::with_capacity(ordered.len() / 2);

    for &participant in ordered {
        if !claimed.insert(participant) {
            continue;
        }

        let mut fallback = None;
        let mut fresh = None;
        for &candidate in ordered {
            if claimed.contains(&candidate) {
                continue;
            }
            if fallback.is_none() {
                fallback = Some(candidate);
            }
            if !history.have_met(participant, candidate) {
                fresh = Some(candidate);
                break;
            }
        }

        let (partner, duplicate) = match (fresh, fallback) {
            (Some(partner), _) => (partner, false),
            (None, Some(partner)) => (partner, true),
            (None, None) => {
                return Err(MatcherError::Internal(format!(
                    "no partner left for {participant}; duplicate ids in pairing input"
                )));
            }
        };

        if duplicate {
            tracing::warn!(
                %participant,
                %partner,
                "no new partner left, pairing a repeat"
            );
        }

        claimed.insert(partner);
        pairs.push(ProposedPair {
            first: participant,
            second: partner,
            duplicate,
        });
    }

    Ok(pairs)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn id(n: u128) -> ParticipantId {
        ParticipantId::from_uuid(uuid::Uuid::from_u128(n))
    }

    fn ids(range: std::ops::Range<u128>) -> Vec<ParticipantId> {
        range.map(id).collect()
    }

    fn covers_everyone(input: &[ParticipantId], pairs: &[ProposedPair]) {
        assert_eq!(pairs.len(), input.len() / 2);
        let mut seen = HashSet::new();
        for pair in pairs {
            assert_ne!(pair.first, pair.second, "self-pair");
            assert!(seen.insert(pair.first), "{} paired twice", pair.first);
            assert!(seen.insert(pair.second), "{} paired twice", pair.second);
        }
        let expected: HashSet<_> = input.iter().copied().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn empty_input_gives_no_pairs() {
        let Ok(pairs) = pair_participants(&[], &HistoryIndex::new()) else {
            panic!("pairing failed");
        };
        assert!(pairs.is_empty());
    }

    #[test]
    fn odd_input_is_rejected() {
        let result = pair_participants(&ids(0..3), &HistoryIndex::new());
        assert!(matches!(result, Err(MatcherError::Internal(_))));
    }

    #[test]
    fn no_history_pairs_everyone() {
        let input = ids(0..4);
        let Ok(pairs) = pair_participants(&input, &HistoryIndex::new()) else {
            panic!("pairing failed");
        };
        covers_everyone(&input, &pairs);
        assert!(pairs.iter().all(|p| !p.duplicate));
    }

    #[test]
    fn skips_past_partners_without_backtracking() {
        // A met B and D before: A must take C, leaving B with D.
        let (a, b, c, d) = (id(1), id(2), id(3), id(4));
        let history = HistoryIndex::from_pairs([(a, b), (a, d)]);
        let Ok(pairs) = pair_participants(&[a, b, c, d], &history) else {
            panic!("pairing failed");
        };
        assert_eq!(
            pairs,
            vec![
                ProposedPair {
                    first: a,
                    second: c,
                    duplicate: false
                },
                ProposedPair {
                    first: b,
                    second: d,
                    duplicate: false
                },
            ]
        );
    }

    #[test]
    fn forced_duplicate_when_nobody_new_is_left() {
        let (a, b) = (id(1), id(2));
        let history = HistoryIndex::from_pairs([(a, b)]);
        let Ok(pairs) = pair_participants(&[a, b], &history) else {
            panic!("pairing failed");
        };
        assert_eq!(pairs.len(), 1);
        assert!(pairs.iter().all(|p| p.duplicate));
    }

    #[test]
    fn greedy_order_can_use_up_fresh_options() {
        // A takes B; C and D have met, so C is forced into a repeat even
        // though (A,C),(B,D) would have had none.
        let (a, b, c, d) = (id(1), id(2), id(3), id(4));
        let history = HistoryIndex::from_pairs([(c, d)]);
        let Ok(pairs) = pair_participants(&[a, b, c, d], &history) else {
            panic!("pairing failed");
        };
        assert_eq!(pairs.iter().filter(|p| p.duplicate).count(), 1);
    }

    #[test]
    fn random_histories_keep_pairing_invariants() {
        for seed in 0..40_u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let size = 2 * rng.random_range(0..20_u128);
            let mut input = ids(0..size);
            input.shuffle(&mut rng);

            let mut history = HistoryIndex::new();
            for _ in 0..(size * 2) {
                let a = id(rng.random_range(0..size.max(1)));
                let b = id(rng.random_range(0..size.max(1)));
                history.record(a, b);
            }

            let Ok(pairs) = pair_participants(&input, &history) else {
                panic!("pairing failed for seed {seed}");
            };
            covers_everyone(&input, &pairs);

            // A repeat is only emitted when every unclaimed participant at
            // that point is a past partner.
            let mut claimed = HashSet::new();
            for pair in &pairs {
                claimed.insert(pair.first);
                let open: Vec<_> = input.iter().filter(|p| !claimed.contains(*p)).collect();
                let any_fresh = open.iter().any(|p| !history.have_met(pair.first, **p));
                assert_eq!(pair.duplicate, !any_fresh, "seed {seed}");
                assert_eq!(pair.duplicate, history.have_met(pair.first, pair.second));
                claimed.insert(pair.second);
            }
        }
    }
}
