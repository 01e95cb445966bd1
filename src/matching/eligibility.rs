//! Eligible participant selection for a round.
//!
//! Picks the available members, shuffles them into the order the pairing
//! engine will walk, and drops one excludable member when the count is odd.
//! Earlier positions get first pick of partners, so the shuffle is what
//! keeps the same people from always choosing last.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::domain::{Availability, Member, ParticipantId, RoundId};
use crate::error::MatcherError;

/// The slice of a member record the selector needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Participant identifier.
    pub participant_id: ParticipantId,
    /// Availability for the round being paired.
    pub availability: Availability,
    /// Whether the participant may be left out on an odd count.
    pub excludable: bool,
}

impl From<&Member> for Candidate {
    fn from(member: &Member) -> Self {
        Self {
            participant_id: member.participant.id,
            availability: member.availability,
            excludable: member.participant.excludable,
        }
    }
}

/// Result of eligibility selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    /// Randomly ordered participants to pair; always even-length.
    pub ordered: Vec<ParticipantId>,
    /// Participant left out because the available count was odd.
    pub excluded: Option<ParticipantId>,
}

/// Selects the participants to pair in `round_id`.
///
/// `existing_pairs` is the number of pairs already persisted for the round.
///
/// # Errors
///
/// - [`MatcherError::AlreadyPaired`] if `existing_pairs` is non-zero.
/// - [`MatcherError::NoExcludableParticipant`] if the available count is
///   odd and none of the available participants is excludable. Nobody is
///   excluded in that case.
pub fn select_eligible<R>(
    round_id: RoundId,
    candidates: &[Candidate],
    existing_pairs: usize,
    rng: &mut R,
) -> Result<Eligibility, MatcherError>
where
    R: Rng + ?Sized,
{
    if existing_pairs > 0 {
        return Err(MatcherError::AlreadyPaired(round_id));
    }

    let mut available: Vec<Candidate> = candidates
        .iter()
        .filter(|c| c.availability == Availability::Available)
        .copied()
        .collect();
    available.shuffle(rng);

    let mut excluded = None;
    if available.len() % 2 == 1 {
        let excludable: Vec<usize> = available
            .iter()
            .enumerate()
            .filter(|(_, c)| c.excludable)
            .map(|(pos, _)| pos)
            .collect();
        let Some(&pos) = excludable.choose(rng) else {
            return Err(MatcherError::NoExcludableParticipant {
                round_id,
                available: available.len(),
            });
        };
        let left_out = available.remove(pos);
        tracing::info!(
            %round_id,
            participant_id = %left_out.participant_id,
            available = available.len() + 1,
            "odd number of available participants, excluding one"
        );
        excluded = Some(left_out.participant_id);
    }

    Ok(Eligibility {
        ordered: available.into_iter().map(|c| c.participant_id).collect(),
        excluded,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn id(n: u128) -> ParticipantId {
        ParticipantId::from_uuid(uuid::Uuid::from_u128(n))
    }

    fn candidate(n: u128, availability: Availability, excludable: bool) -> Candidate {
        Candidate {
            participant_id: id(n),
            availability,
            excludable,
        }
    }

    fn available(n: u128) -> Candidate {
        candidate(n, Availability::Available, false)
    }

    #[test]
    fn refuses_round_with_existing_pairs() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = select_eligible(RoundId::new(), &[available(1), available(2)], 1, &mut rng);
        assert!(matches!(result, Err(MatcherError::AlreadyPaired(_))));
    }

    #[test]
    fn keeps_only_available_participants() {
        let mut rng = StdRng::seed_from_u64(2);
        let candidates = [
            available(1),
            candidate(2, Availability::Unknown, true),
            available(3),
            candidate(4, Availability::Unavailable, true),
        ];
        let Ok(result) = select_eligible(RoundId::new(), &candidates, 0, &mut rng) else {
            panic!("selection failed");
        };
        let chosen: HashSet<_> = result.ordered.iter().copied().collect();
        assert_eq!(chosen, HashSet::from([id(1), id(3)]));
        assert_eq!(result.excluded, None);
    }

    #[test]
    fn odd_pool_excludes_the_only_excludable() {
        let mut rng = StdRng::seed_from_u64(3);
        let candidates = [
            available(1),
            available(2),
            candidate(3, Availability::Available, true),
        ];
        let Ok(result) = select_eligible(RoundId::new(), &candidates, 0, &mut rng) else {
            panic!("selection failed");
        };
        assert_eq!(result.excluded, Some(id(3)));
        let chosen: HashSet<_> = result.ordered.iter().copied().collect();
        assert_eq!(chosen, HashSet::from([id(1), id(2)]));
    }

    #[test]
    fn unavailable_excludable_does_not_count() {
        let mut rng = StdRng::seed_from_u64(4);
        let candidates = [
            available(1),
            available(2),
            available(3),
            candidate(4, Availability::Unavailable, true),
        ];
        let result = select_eligible(RoundId::new(), &candidates, 0, &mut rng);
        let Err(MatcherError::NoExcludableParticipant { available: count, .. }) = result else {
            panic!("expected NoExcludableParticipant");
        };
        assert_eq!(count, 3);
    }

    #[test]
    fn odd_pools_always_yield_even_lists() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let candidates: Vec<Candidate> = (0..11)
                .map(|n| candidate(n, Availability::Available, n % 3 == 0))
                .collect();
            let Ok(result) = select_eligible(RoundId::new(), &candidates, 0, &mut rng) else {
                panic!("selection failed");
            };
            assert_eq!(result.ordered.len(), 10);
            let Some(excluded) = result.excluded else {
                panic!("expected an exclusion");
            };
            assert!(!result.ordered.contains(&excluded));
            assert_eq!(excluded.as_uuid().as_u128() % 3, 0);
        }
    }

    #[test]
    fn same_seed_gives_same_order() {
        let candidates: Vec<Candidate> = (0..20).map(available).collect();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first = select_eligible(RoundId::new(), &candidates, 0, &mut a).ok();
        let second = select_eligible(RoundId::new(), &candidates, 0, &mut b).ok();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_pool_is_valid() {
        let mut rng = StdRng::seed_from_u64(5);
        let Ok(result) = select_eligible(RoundId::new(), &[], 0, &mut rng) else {
            panic!("selection failed");
        };
        assert!(result.ordered.is_empty());
        assert_eq!(result.excluded, None);
    }
}
