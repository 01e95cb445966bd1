//! Notification layer: the [`Notifier`] port and its adapters.
//!
//! The pairing controller calls [`Notifier::introduce`] once per persisted
//! pair, after the pair is stored. Delivery guarantees (retries, backoff)
//! belong to the notifier, see [`RetryingNotifier`].

pub mod logging;
pub mod messages;
pub mod recording;
pub mod retry;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Group, Pair, PairId, Participant, Round, RoundId};

pub use logging::LoggingNotifier;
pub use recording::{Notification, RecordingNotifier};
pub use retry::{RetryPolicy, RetryingNotifier};

/// Everything needed to introduce the two members of a new pair.
#[derive(Debug, Clone, Serialize)]
pub struct Introduction {
    /// Durable pair identifier; retries are keyed by it.
    pub pair_id: PairId,
    /// Round the pair was made for.
    pub round_id: RoundId,
    /// Name of the group the pair met through.
    pub group_name: String,
    /// One member.
    pub first: Participant,
    /// The other member.
    pub second: Participant,
}

/// Messaging provider failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The provider throttled us. `retry_after` carries its hint, if any.
    #[error("rate limited by messaging provider")]
    RateLimited {
        /// Provider-suggested wait before retrying.
        retry_after: Option<Duration>,
    },

    /// Network or provider-side failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider refused the message (unknown user, closed channel).
    #[error("message rejected: {0}")]
    Rejected(String),
}

impl NotifyError {
    /// Returns `true` if sending again may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transport(_))
    }

    /// Provider-suggested wait before the next attempt.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Outbound messaging port.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Introduces the two members of a newly created pair to each other.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if the message could not be delivered.
    async fn introduce(&self, intro: &Introduction) -> Result<(), NotifyError>;

    /// Asks a member whether they want to be paired in a new round.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if the message could not be delivered.
    async fn ask_availability(
        &self,
        participant: &Participant,
        group: &Group,
        round: &Round,
    ) -> Result<(), NotifyError>;

    /// Asks a member whether they met their previous partner.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if the message could not be delivered.
    async fn ask_if_met(
        &self,
        participant: &Participant,
        partner: &Participant,
        group: &Group,
        pair: &Pair,
    ) -> Result<(), NotifyError>;
}
