//! In-memory notifier that records calls; can be primed to fail.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Introduction, Notifier, NotifyError};
use crate::domain::{Group, Pair, PairId, Participant, ParticipantId, Round, RoundId};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// [`Notifier::introduce`] for a pair.
    Introduction {
        /// Pair introduced.
        pair_id: PairId,
        /// The two members.
        members: [ParticipantId; 2],
    },
    /// [`Notifier::ask_availability`].
    AvailabilityRequest {
        /// Recipient.
        participant_id: ParticipantId,
        /// Round asked about.
        round_id: RoundId,
    },
    /// [`Notifier::ask_if_met`].
    MetFollowUp {
        /// Recipient.
        participant_id: ParticipantId,
        /// Pair asked about.
        pair_id: PairId,
    },
}

/// Records every delivered notification in memory.
///
/// [`RecordingNotifier::fail_next`] makes the next `n` calls fail with a
/// retryable transport error; failed calls are counted but not recorded.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<Notification>>,
    failures_left: AtomicUsize,
    attempts: AtomicUsize,
    delay: Duration,
}

impl RecordingNotifier {
    /// Creates a notifier that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier that takes `delay` to answer each call.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Fails the next `n` calls.
    pub fn fail_next(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    /// Total calls, failed ones included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Successfully delivered notifications in call order.
    pub async fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().await.clone()
    }

    /// Pair IDs of delivered introductions in call order.
    pub async fn introduced_pairs(&self) -> Vec<PairId> {
        self.delivered
            .lock()
            .await
            .iter()
            .filter_map(|n| match n {
                Notification::Introduction { pair_id, .. } => Some(*pair_id),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, notification: Notification) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(NotifyError::Transport("injected failure".to_string()));
        }
        self.delivered.lock().await.push(notification);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn introduce(&self, intro: &Introduction) -> Result<(), NotifyError> {
        self.record(Notification::Introduction {
            pair_id: intro.pair_id,
            members: [intro.first.id, intro.second.id],
        })
        .await
    }

    async fn ask_availability(
        &self,
        participant: &Participant,
        _group: &Group,
        round: &Round,
    ) -> Result<(), NotifyError> {
        self.record(Notification::AvailabilityRequest {
            participant_id: participant.id,
            round_id: round.id,
        })
        .await
    }

    async fn ask_if_met(
        &self,
        participant: &Participant,
        _partner: &Participant,
        _group: &Group,
        pair: &Pair,
    ) -> Result<(), NotifyError> {
        self.record(Notification::MetFollowUp {
            participant_id: participant.id,
            pair_id: pair.id,
        })
        .await
    }
}
