//! Directory service: groups, participants and group membership.

use std::sync::Arc;

use crate::domain::group::MAX_GROUP_NAME_LEN;
use crate::domain::{Availability, Group, GroupId, Participant, ParticipantId};
use crate::error::MatcherError;
use crate::persistence::MatchStore;

/// Fields supplied when a participant registers.
#[derive(Debug, Clone, Default)]
pub struct NewParticipant {
    /// Chat handle, unique across the service.
    pub handle: String,
    /// First name.
    pub given_name: String,
    /// Last name.
    pub surname: String,
    /// Self-introduction.
    pub intro: String,
    /// Whether the participant may sit out an odd round.
    pub excludable: bool,
}

/// Maintains the group directory and each member's profile.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    store: Arc<dyn MatchStore>,
}

impl DirectoryService {
    /// Creates a new `DirectoryService`.
    #[must_use]
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Creates a group bound to a chat channel.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::InvalidRequest`] if the name is blank or longer
    ///   than [`MAX_GROUP_NAME_LEN`] characters, or the channel is blank.
    /// - [`MatcherError::Conflict`] if the name or channel is taken.
    pub async fn create_group(&self, name: &str, channel_id: &str) -> Result<Group, MatcherError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MatcherError::InvalidRequest(
                "group name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_GROUP_NAME_LEN {
            return Err(MatcherError::InvalidRequest(format!(
                "group name must be at most {MAX_GROUP_NAME_LEN} characters"
            )));
        }
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Err(MatcherError::InvalidRequest(
                "channel_id must not be empty".to_string(),
            ));
        }

        let group = self.store.insert_group(Group::new(name, channel_id)).await?;
        tracing::info!(group_id = %group.id, name = %group.name, "group created");
        Ok(group)
    }

    /// Returns all groups.
    ///
    /// # Errors
    ///
    /// Returns a [`MatcherError`] on persistence failure.
    pub async fn list_groups(&self) -> Result<Vec<Group>, MatcherError> {
        self.store.list_groups().await
    }

    /// Registers a participant and adds them to `group_ids`.
    ///
    /// All groups are checked before anything is written.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::InvalidRequest`] if the handle or given name is blank.
    /// - [`MatcherError::GroupNotFound`] if any group does not exist.
    /// - [`MatcherError::Conflict`] if the handle is taken.
    pub async fn register_participant(
        &self,
        new: NewParticipant,
        group_ids: &[GroupId],
    ) -> Result<Participant, MatcherError> {
        let handle = new.handle.trim().trim_start_matches('@');
        if handle.is_empty() {
            return Err(MatcherError::InvalidRequest(
                "handle must not be empty".to_string(),
            ));
        }
        if new.given_name.trim().is_empty() {
            return Err(MatcherError::InvalidRequest(
                "given_name must not be empty".to_string(),
            ));
        }
        for &group_id in group_ids {
            self.store.group(group_id).await?;
        }

        let mut participant = Participant::new(handle, new.given_name.trim(), new.surname.trim());
        participant.intro = new.intro;
        participant.excludable = new.excludable;
        let participant = self.store.insert_participant(participant).await?;

        for &group_id in group_ids {
            self.store.add_membership(participant.id, group_id).await?;
        }

        tracing::info!(
            participant_id = %participant.id,
            handle = %participant.handle,
            groups = group_ids.len(),
            "participant registered"
        );
        Ok(participant)
    }

    /// Adds an existing participant to a group. Joining twice is a no-op.
    ///
    /// # Errors
    ///
    /// [`MatcherError::ParticipantNotFound`] or [`MatcherError::GroupNotFound`].
    pub async fn join_group(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
    ) -> Result<(), MatcherError> {
        self.store.add_membership(participant_id, group_id).await?;
        tracing::info!(%participant_id, %group_id, "participant joined group");
        Ok(())
    }

    /// Records a member's answer to the availability request.
    ///
    /// # Errors
    ///
    /// [`MatcherError::InvalidRequest`] if the participant is not a member
    /// of the group.
    pub async fn set_availability(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
        availability: Availability,
    ) -> Result<(), MatcherError> {
        self.store
            .set_availability(participant_id, group_id, availability)
            .await?;
        tracing::debug!(
            %participant_id,
            %group_id,
            availability = availability.as_str(),
            "availability recorded"
        );
        Ok(())
    }

    /// Replaces a participant's self-introduction.
    ///
    /// # Errors
    ///
    /// [`MatcherError::ParticipantNotFound`] if the participant does not exist.
    pub async fn update_intro(
        &self,
        participant_id: ParticipantId,
        intro: String,
    ) -> Result<Participant, MatcherError> {
        let mut participant = self.store.participant(participant_id).await?;
        participant.intro = intro;
        self.store.update_participant(&participant).await?;
        Ok(participant)
    }

    /// Sets whether the participant may be left out of odd rounds.
    ///
    /// # Errors
    ///
    /// [`MatcherError::ParticipantNotFound`] if the participant does not exist.
    pub async fn set_excludable(
        &self,
        participant_id: ParticipantId,
        excludable: bool,
    ) -> Result<Participant, MatcherError> {
        let mut participant = self.store.participant(participant_id).await?;
        participant.excludable = excludable;
        self.store.update_participant(&participant).await?;
        tracing::info!(%participant_id, excludable, "excludable flag updated");
        Ok(participant)
    }

    /// Looks up a participant.
    ///
    /// # Errors
    ///
    /// [`MatcherError::ParticipantNotFound`] if the participant does not exist.
    pub async fn participant(&self, id: ParticipantId) -> Result<Participant, MatcherError> {
        self.store.participant(id).await
    }
}
