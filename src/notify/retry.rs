//! Retry decorator for any [`Notifier`].
//!
//! Retryable failures are retried with exponential backoff plus jitter,
//! `min(base · 2^retry + base · jitter, max_delay)`. A retry-after hint from
//! the provider replaces the computed delay but is still capped at
//! `max_delay`.

use std::time::Duration;

use async_trait::async_trait;

use super::{Introduction, Notifier, NotifyError};
use crate::config::MatcherConfig;
use crate::domain::{Group, Pair, Participant, Round};

/// Backoff parameters for [`RetryingNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay unit; the first retry waits between one and two units.
    pub base_delay: Duration,
    /// Upper bound on every delay, provider hints included.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Builds the policy from `NOTIFY_*` settings.
    #[must_use]
    pub fn from_config(config: &MatcherConfig) -> Self {
        Self {
            max_retries: config.notify_max_retries,
            max_delay: Duration::from_secs(config.notify_max_backoff_secs),
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (0-based). `jitter` is clamped to
    /// `[0, 1]`.
    #[must_use]
    pub fn delay_for(&self, retry: u32, jitter: f64) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2_u32.saturating_pow(retry));
        let jitter = self.base_delay.mul_f64(jitter.clamp(0.0, 1.0));
        exponential.saturating_add(jitter).min(self.max_delay)
    }
}

/// Wraps a notifier and retries retryable failures.
#[derive(Debug)]
pub struct RetryingNotifier<N> {
    inner: N,
    policy: RetryPolicy,
}

impl<N: Notifier> RetryingNotifier<N> {
    /// Wraps `inner` with the given policy.
    #[must_use]
    pub const fn new(inner: N, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Returns the wrapped notifier.
    #[must_use]
    pub const fn inner(&self) -> &N {
        &self.inner
    }

    async fn deliver<F, Fut>(
        &self,
        kind: &'static str,
        key: String,
        mut send: F,
    ) -> Result<(), NotifyError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<(), NotifyError>> + Send,
    {
        let mut retry = 0;
        loop {
            match send().await {
                Ok(()) => {
                    if retry > 0 {
                        tracing::info!(kind, key = %key, retries = retry, "delivered after retrying");
                    }
                    return Ok(());
                }
                Err(e) if e.is_retryable() && retry < self.policy.max_retries => {
                    let delay = e.retry_after().map_or_else(
                        || self.policy.delay_for(retry, rand::random()),
                        |hint| hint.min(self.policy.max_delay),
                    );
                    tracing::warn!(
                        kind,
                        key = %key,
                        error = %e,
                        retries_left = self.policy.max_retries - retry,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "delivery failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) => {
                    tracing::error!(kind, key = %key, error = %e, retries = retry, "delivery failed");
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl<N: Notifier> Notifier for RetryingNotifier<N> {
    async fn introduce(&self, intro: &Introduction) -> Result<(), NotifyError> {
        self.deliver("introduction", intro.pair_id.to_string(), || {
            self.inner.introduce(intro)
        })
        .await
    }

    async fn ask_availability(
        &self,
        participant: &Participant,
        group: &Group,
        round: &Round,
    ) -> Result<(), NotifyError> {
        self.deliver("availability_request", participant.id.to_string(), || {
            self.inner.ask_availability(participant, group, round)
        })
        .await
    }

    async fn ask_if_met(
        &self,
        participant: &Participant,
        partner: &Participant,
        group: &Group,
        pair: &Pair,
    ) -> Result<(), NotifyError> {
        self.deliver("met_follow_up", pair.id.to_string(), || {
            self.inner.ask_if_met(participant, partner, group, pair)
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{PairId, RoundId};
    use crate::notify::RecordingNotifier;

    fn instant_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    fn intro() -> Introduction {
        Introduction {
            pair_id: PairId::new(),
            round_id: RoundId::new(),
            group_name: "coffee".to_string(),
            first: Participant::new("ada", "Ada", "Lovelace"),
            second: Participant::new("alan", "Alan", "Turing"),
        }
    }

    #[derive(Debug)]
    struct Rejecting;

    /// Rate-limits the first introduction with a one-hour hint.
    #[derive(Debug, Default)]
    struct SlowDown {
        limited: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl Notifier for SlowDown {
        async fn introduce(&self, _intro: &Introduction) -> Result<(), NotifyError> {
            if self.limited.swap(true, std::sync::atomic::Ordering::SeqCst) {
                Ok(())
            } else {
                Err(NotifyError::RateLimited {
                    retry_after: Some(Duration::from_secs(3_600)),
                })
            }
        }

        async fn ask_availability(
            &self,
            _participant: &Participant,
            _group: &Group,
            _round: &Round,
        ) -> Result<(), NotifyError> {
            Ok(())
        }

        async fn ask_if_met(
            &self,
            _participant: &Participant,
            _partner: &Participant,
            _group: &Group,
            _pair: &Pair,
        ) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    #[async_trait]
    impl Notifier for Rejecting {
        async fn introduce(&self, _intro: &Introduction) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected("channel_not_found".to_string()))
        }

        async fn ask_availability(
            &self,
            _participant: &Participant,
            _group: &Group,
            _round: &Round,
        ) -> Result<(), NotifyError> {
            Ok(())
        }

        async fn ask_if_met(
            &self,
            _participant: &Participant,
            _partner: &Participant,
            _group: &Group,
            _pair: &Pair,
        ) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    #[test]
    fn delay_grows_exponentially_and_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0, 0.0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3, 0.0), Duration::from_secs(8));
        assert_eq!(policy.delay_for(2, 0.5), Duration::from_millis(4_500));
        assert_eq!(policy.delay_for(10, 0.0), Duration::from_secs(120));
        assert_eq!(policy.delay_for(40, 1.0), Duration::from_secs(120));
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let notifier = RetryingNotifier::new(RecordingNotifier::new(), instant_policy(5));
        notifier.inner().fail_next(2);

        let intro = intro();
        assert!(notifier.introduce(&intro).await.is_ok());
        assert_eq!(notifier.inner().attempts(), 3);
        assert_eq!(notifier.inner().introduced_pairs().await, vec![intro.pair_id]);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let notifier = RetryingNotifier::new(RecordingNotifier::new(), instant_policy(3));
        notifier.inner().fail_next(10);

        let result = notifier.introduce(&intro()).await;
        assert!(matches!(result, Err(NotifyError::Transport(_))));
        assert_eq!(notifier.inner().attempts(), 4);
        assert!(notifier.inner().delivered().await.is_empty());
    }

    #[tokio::test]
    async fn rejected_messages_are_not_retried() {
        let notifier = RetryingNotifier::new(Rejecting, instant_policy(5));
        let result = notifier.introduce(&intro()).await;
        assert!(matches!(result, Err(NotifyError::Rejected(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_hint_is_capped_at_max_delay() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(2),
        };
        let notifier = RetryingNotifier::new(SlowDown::default(), policy);

        let started = tokio::time::Instant::now();
        assert!(notifier.introduce(&intro()).await.is_ok());
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(2));
        assert!(waited < Duration::from_secs(3));
    }

    #[test]
    fn rate_limit_hint_is_exposed() {
        let err = NotifyError::RateLimited {
            retry_after: Some(Duration::from_secs(30)),
        };
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
        assert!(!NotifyError::Rejected("x".to_string()).is_retryable());
    }
}
