//! Participant DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Availability, GroupId, Participant, ParticipantId};
use crate::service::NewParticipant;

/// Request body for `POST /participants`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterParticipantRequest {
    /// Chat handle; a leading `@` is stripped.
    pub handle: String,
    /// First name.
    pub given_name: String,
    /// Last name.
    #[serde(default)]
    pub surname: String,
    /// Self-introduction shared with partners.
    #[serde(default)]
    pub intro: String,
    /// May sit out a round with an odd number of available members.
    #[serde(default)]
    pub excludable: bool,
    /// Groups to join right away.
    #[serde(default)]
    pub group_ids: Vec<GroupId>,
}

impl RegisterParticipantRequest {
    /// Splits the request into profile fields and group IDs.
    #[must_use]
    pub fn into_parts(self) -> (NewParticipant, Vec<GroupId>) {
        (
            NewParticipant {
                handle: self.handle,
                given_name: self.given_name,
                surname: self.surname,
                intro: self.intro,
                excludable: self.excludable,
            },
            self.group_ids,
        )
    }
}

/// Request body for `PUT /participants/{id}/availability`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAvailabilityRequest {
    /// Group whose current round the answer applies to.
    pub group_id: GroupId,
    /// The answer.
    pub availability: Availability,
}

/// Request body for `PUT /participants/{id}/intro`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIntroRequest {
    /// New self-introduction; may span several lines.
    pub intro: String,
}

/// Request body for `PUT /participants/{id}/excludable`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetExcludableRequest {
    /// New flag value.
    pub excludable: bool,
}

/// A participant as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantDto {
    /// Participant identifier.
    pub participant_id: ParticipantId,
    /// Chat handle.
    pub handle: String,
    /// First name.
    pub given_name: String,
    /// Last name.
    pub surname: String,
    /// Self-introduction.
    pub intro: String,
    /// Excludable flag.
    pub excludable: bool,
    /// Registration timestamp.
    pub joined_at: DateTime<Utc>,
}

impl From<Participant> for ParticipantDto {
    fn from(p: Participant) -> Self {
        Self {
            participant_id: p.id,
            handle: p.handle,
            given_name: p.given_name,
            surname: p.surname,
            intro: p.intro,
            excludable: p.excludable,
            joined_at: p.joined_at,
        }
    }
}
