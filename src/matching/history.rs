//! Who has already been paired with whom.
//!
//! [`HistoryIndex`] is built from every pair ever created, across all
//! groups and rounds, so repeat encounters are discouraged service-wide and
//! not just within one group.

use std::collections::{HashMap, HashSet};

use crate::domain::ParticipantId;

/// Undirected "has been paired with" relation.
///
/// A pair `(a, b)` makes `b` a past partner of `a` and `a` a past partner
/// of `b`. Self-pairs are ignored.
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    partners: HashMap<ParticipantId, HashSet<ParticipantId>>,
}

impl HistoryIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from historical pairs in any order.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ParticipantId, ParticipantId)>,
    {
        let mut index = Self::new();
        for (a, b) in pairs {
            index.record(a, b);
        }
        index
    }

    /// Adds one pair to the relation.
    pub fn record(&mut self, a: ParticipantId, b: ParticipantId) {
        if a == b {
            return;
        }
        self.partners.entry(a).or_default().insert(b);
        self.partners.entry(b).or_default().insert(a);
    }

    /// Returns everyone `participant` has ever been paired with.
    #[must_use]
    pub fn past_partners(&self, participant: ParticipantId) -> HashSet<ParticipantId> {
        self.partners.get(&participant).cloned().unwrap_or_default()
    }

    /// Returns `true` if `a` and `b` have been paired before.
    #[must_use]
    pub fn have_met(&self, a: ParticipantId, b: ParticipantId) -> bool {
        self.partners
            .get(&a)
            .is_some_and(|partners| partners.contains(&b))
    }

    /// Number of distinct past partners of `participant`.
    #[must_use]
    pub fn partner_count(&self, participant: ParticipantId) -> usize {
        self.partners.get(&participant).map_or(0, HashSet::len)
    }

    /// Returns `true` if no pair has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> ParticipantId {
        ParticipantId::from_uuid(uuid::Uuid::from_u128(n))
    }

    #[test]
    fn empty_history_has_no_partners() {
        let index = HistoryIndex::new();
        assert!(index.is_empty());
        assert!(index.past_partners(id(1)).is_empty());
        assert!(!index.have_met(id(1), id(2)));
    }

    #[test]
    fn relation_is_symmetric() {
        let index = HistoryIndex::from_pairs([(id(1), id(2))]);
        assert!(index.past_partners(id(1)).contains(&id(2)));
        assert!(index.past_partners(id(2)).contains(&id(1)));
        assert!(index.have_met(id(2), id(1)));
    }

    #[test]
    fn repeated_pairs_are_counted_once() {
        let index = HistoryIndex::from_pairs([(id(1), id(2)), (id(2), id(1)), (id(1), id(3))]);
        assert_eq!(index.partner_count(id(1)), 2);
        assert_eq!(index.partner_count(id(2)), 1);
        assert_eq!(index.partner_count(id(4)), 0);
    }

    #[test]
    fn self_pairs_are_ignored() {
        let mut index = HistoryIndex::new();
        index.record(id(5), id(5));
        assert!(index.is_empty());
    }
}
