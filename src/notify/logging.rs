//! Notifier that renders messages into the log instead of sending them.

use async_trait::async_trait;

use super::{Introduction, Notifier, NotifyError, messages};
use crate::domain::{Group, Pair, Participant, Round};

/// Writes every message to `tracing` at `info` level. Used when no chat
/// client is configured.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    /// Creates a new logging notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn introduce(&self, intro: &Introduction) -> Result<(), NotifyError> {
        tracing::info!(
            pair_id = %intro.pair_id,
            round_id = %intro.round_id,
            to = ?[&intro.first.handle, &intro.second.handle],
            message = %messages::introduction(intro),
            "introduction"
        );
        Ok(())
    }

    async fn ask_availability(
        &self,
        participant: &Participant,
        group: &Group,
        round: &Round,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            participant_id = %participant.id,
            round_id = %round.id,
            to = %participant.handle,
            message = %messages::availability_request(participant, group, round),
            "availability request"
        );
        Ok(())
    }

    async fn ask_if_met(
        &self,
        participant: &Participant,
        partner: &Participant,
        group: &Group,
        pair: &Pair,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            participant_id = %participant.id,
            pair_id = %pair.id,
            to = %participant.handle,
            message = %messages::met_follow_up(participant, partner, group),
            "met follow-up"
        );
        Ok(())
    }
}
