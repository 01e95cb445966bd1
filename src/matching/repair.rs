//! Single-swap repair of forced duplicates.
//!
//! For every repeat pair `(a, b)` left by the greedy pass, look for another
//! pair `(c, d)` such that `(a, c), (b, d)` or `(a, d), (b, c)` are both
//! new encounters, and swap partners. At most one swap is applied per
//! repeat and swaps are never undone, so the pass stays O(N) per repeat.

use super::{HistoryIndex, ProposedPair};

/// Rewrites repeat pairs in place where one partner swap removes them.
///
/// Returns how many repeats were eliminated. Pairs that cannot be fixed by
/// a single swap stay marked as duplicates.
pub fn repair_forced_duplicates(pairs: &mut [ProposedPair], history: &HistoryIndex) -> usize {
    let mut repaired = 0;

    for i in 0..pairs.len() {
        let Some(&broken) = pairs.get(i) else {
            continue;
        };
        if !broken.duplicate {
            continue;
        }

        let swap = pairs.iter().enumerate().find_map(|(j, other)| {
            if j == i {
                return None;
            }
            swap_partners(broken, *other, history).map(|fixed| (j, *other, fixed))
        });

        let Some((j, other, (left, right))) = swap else {
            continue;
        };

        repaired += 1 + usize::from(other.duplicate);
        tracing::debug!(
            first = %broken.first,
            second = %broken.second,
            "repeat pair repaired by swapping partners"
        );
        if let Some(slot) = pairs.get_mut(i) {
            *slot = left;
        }
        if let Some(slot) = pairs.get_mut(j) {
            *slot = right;
        }
    }

    repaired
}

/// Returns the two replacement pairs if swapping partners between `broken`
/// and `other` yields two new encounters.
fn swap_partners(
    broken: ProposedPair,
    other: ProposedPair,
    history: &HistoryIndex,
) -> Option<(ProposedPair, ProposedPair)> {
    let (a, b) = (broken.first, broken.second);
    let (c, d) = (other.first, other.second);

    [(c, d), (d, c)].into_iter().find_map(|(x, y)| {
        if history.have_met(a, x) || history.have_met(b, y) {
            return None;
        }
        Some((
            ProposedPair {
                first: a,
                second: x,
                duplicate: false,
            },
            ProposedPair {
                first: b,
                second: y,
                duplicate: false,
            },
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::ParticipantId;
    use crate::matching::pair_participants;

    fn id(n: u128) -> ParticipantId {
        ParticipantId::from_uuid(uuid::Uuid::from_u128(n))
    }

    #[test]
    fn swap_removes_avoidable_repeat() {
        let (a, b, c, d) = (id(1), id(2), id(3), id(4));
        let history = HistoryIndex::from_pairs([(c, d)]);
        let mut pairs = pair_participants(&[a, b, c, d], &history).unwrap_or_default();
        assert_eq!(pairs.iter().filter(|p| p.duplicate).count(), 1);

        let repaired = repair_forced_duplicates(&mut pairs, &history);
        assert_eq!(repaired, 1);
        assert!(pairs.iter().all(|p| !p.duplicate));
        assert!(pairs.iter().all(|p| !history.have_met(p.first, p.second)));

        let members: HashSet<_> = pairs.iter().flat_map(|p| [p.first, p.second]).collect();
        assert_eq!(members, HashSet::from([a, b, c, d]));
    }

    #[test]
    fn unavoidable_repeat_is_left_alone() {
        // Everyone has met everyone: nothing to swap into.
        let people: Vec<_> = (1..=4).map(id).collect();
        let mut history = HistoryIndex::new();
        for &x in &people {
            for &y in &people {
                history.record(x, y);
            }
        }
        let mut pairs = pair_participants(&people, &history).unwrap_or_default();
        let before = pairs.clone();
        assert_eq!(repair_forced_duplicates(&mut pairs, &history), 0);
        assert_eq!(pairs, before);
    }

    #[test]
    fn clean_pairing_is_untouched() {
        let people: Vec<_> = (1..=6).map(id).collect();
        let history = HistoryIndex::new();
        let mut pairs = pair_participants(&people, &history).unwrap_or_default();
        let before = pairs.clone();
        assert_eq!(repair_forced_duplicates(&mut pairs, &history), 0);
        assert_eq!(pairs, before);
    }
}
