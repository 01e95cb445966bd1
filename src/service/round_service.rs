//! Round service: opening rounds and recording meeting outcomes.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::{Group, GroupId, Member, MetOutcome, Pair, PairId, Round, RoundId};
use crate::error::MatcherError;
use crate::notify::Notifier;
use crate::persistence::MatchStore;

/// Outcome of [`RoundService::open_round`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOpened {
    /// The new round.
    pub round: Round,
    /// Availability requests delivered.
    pub availability_requests: usize,
    /// "Did you meet?" follow-ups delivered.
    pub met_follow_ups: usize,
    /// Messages the notifier failed to deliver.
    pub notifications_failed: usize,
}

/// Opens rounds and tracks whether pairs actually met.
#[derive(Debug, Clone)]
pub struct RoundService {
    store: Arc<dyn MatchStore>,
    notifier: Arc<dyn Notifier>,
    round_length_days: u32,
}

impl RoundService {
    /// Creates a new `RoundService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn MatchStore>,
        notifier: Arc<dyn Notifier>,
        round_length_days: u32,
    ) -> Self {
        Self {
            store,
            notifier,
            round_length_days,
        }
    }

    /// Opens a new round for a group.
    ///
    /// Resets every member's availability to unknown, asks each member
    /// whether they want to take part, and asks members whose latest pair
    /// in this group has no recorded outcome whether they met. The round
    /// starts on `start_date`, or today when `None`.
    ///
    /// # Errors
    ///
    /// [`MatcherError::GroupNotFound`] if the group does not exist.
    pub async fn open_round(
        &self,
        group_id: GroupId,
        start_date: Option<NaiveDate>,
    ) -> Result<RoundOpened, MatcherError> {
        let group = self.store.group(group_id).await?;
        let start = start_date.unwrap_or_else(|| Utc::now().date_naive());
        let round = self
            .store
            .insert_round(Round::new(group_id, start, self.round_length_days))
            .await?;
        let reset = self.store.reset_availability(group_id).await?;
        let members = self.store.members(group_id).await?;

        let mut opened = RoundOpened {
            round,
            availability_requests: 0,
            met_follow_ups: 0,
            notifications_failed: 0,
        };
        for member in &members {
            self.follow_up(&group, member, &members, &mut opened).await?;

            let participant = &member.participant;
            match self
                .notifier
                .ask_availability(participant, &group, &opened.round)
                .await
            {
                Ok(()) => opened.availability_requests += 1,
                Err(e) => {
                    tracing::error!(
                        participant_id = %participant.id,
                        error = %e,
                        "availability request not delivered"
                    );
                    opened.notifications_failed += 1;
                }
            }
        }

        tracing::info!(
            round_id = %opened.round.id,
            %group_id,
            start = %opened.round.start_date,
            end = %opened.round.end_date,
            reset,
            availability_requests = opened.availability_requests,
            met_follow_ups = opened.met_follow_ups,
            "round opened"
        );
        Ok(opened)
    }

    /// Sends the "did you meet?" follow-up if the member's latest pair in
    /// the group is still undecided.
    async fn follow_up(
        &self,
        group: &Group,
        member: &Member,
        members: &[Member],
        opened: &mut RoundOpened,
    ) -> Result<(), MatcherError> {
        let participant = &member.participant;
        let Some(pair) = self
            .store
            .latest_pair_in_group(participant.id, group.id)
            .await?
        else {
            return Ok(());
        };
        if pair.met != MetOutcome::Unknown {
            return Ok(());
        }
        let Some(partner_id) = pair.partner_of(participant.id) else {
            return Ok(());
        };
        let partner = match members.iter().find(|m| m.participant.id == partner_id) {
            Some(m) => m.participant.clone(),
            None => self.store.participant(partner_id).await?,
        };

        match self
            .notifier
            .ask_if_met(participant, &partner, group, &pair)
            .await
        {
            Ok(()) => opened.met_follow_ups += 1,
            Err(e) => {
                tracing::error!(
                    participant_id = %participant.id,
                    pair_id = %pair.id,
                    error = %e,
                    "met follow-up not delivered"
                );
                opened.notifications_failed += 1;
            }
        }
        Ok(())
    }

    /// Records whether a pair met.
    ///
    /// # Errors
    ///
    /// [`MatcherError::PairNotFound`] if the pair does not exist.
    pub async fn record_met(&self, pair_id: PairId, met: MetOutcome) -> Result<Pair, MatcherError> {
        let pair = self.store.set_met(pair_id, met).await?;
        tracing::info!(%pair_id, ?met, "meeting outcome recorded");
        Ok(pair)
    }

    /// Looks up a round.
    ///
    /// # Errors
    ///
    /// [`MatcherError::RoundNotFound`] if the round does not exist.
    pub async fn round(&self, round_id: RoundId) -> Result<Round, MatcherError> {
        self.store.round(round_id).await
    }

    /// Pairs of a round in creation order.
    ///
    /// # Errors
    ///
    /// [`MatcherError::RoundNotFound`] if the round does not exist.
    pub async fn pairs_for_round(&self, round_id: RoundId) -> Result<Vec<Pair>, MatcherError> {
        self.store.round(round_id).await?;
        self.store.pairs_for_round(round_id).await
    }
}
