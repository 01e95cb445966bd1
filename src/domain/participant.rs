//! Participants and their per-group availability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ParticipantId;

/// Whether a participant wants to be paired in the current round of a group.
///
/// Reset to [`Availability::Unknown`] for every member whenever a new round
/// is opened; only [`Availability::Available`] members are eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// The participant has not answered yet.
    #[default]
    Unknown,
    /// The participant opted in for this round.
    Available,
    /// The participant opted out of this round.
    Unavailable,
}

impl Availability {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }

    /// Parses the storage representation. Unrecognised values map to
    /// [`Availability::Unknown`].
    #[must_use]
    pub fn from_db(value: &str) -> Self {
        match value {
            "available" => Self::Available,
            "unavailable" => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

/// A person who can be paired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier.
    pub id: ParticipantId,
    /// Chat handle, unique across the service.
    pub handle: String,
    /// First name used in greetings.
    pub given_name: String,
    /// Last name.
    pub surname: String,
    /// Self-introduction shared with each new partner.
    pub intro: String,
    /// May be left out of a round when the available count is odd.
    pub excludable: bool,
    /// When the participant was first seen.
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    /// Creates a participant with an empty intro who cannot be excluded.
    #[must_use]
    pub fn new(handle: impl Into<String>, given_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            handle: handle.into(),
            given_name: given_name.into(),
            surname: surname.into(),
            intro: String::new(),
            excludable: false,
            joined_at: Utc::now(),
        }
    }

    /// `"Given Surname (@handle)"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {} (@{})", self.given_name, self.surname, self.handle)
    }
}

/// A participant as seen from one group: the record plus the availability
/// they gave for that group's current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The participant record.
    pub participant: Participant,
    /// Availability for the group's current round.
    pub availability: Availability,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_storage_round_trip() {
        for a in [
            Availability::Unknown,
            Availability::Available,
            Availability::Unavailable,
        ] {
            assert_eq!(Availability::from_db(a.as_str()), a);
        }
        assert_eq!(Availability::from_db("maybe"), Availability::Unknown);
    }

    #[test]
    fn display_name_includes_handle() {
        let p = Participant::new("ada", "Ada", "Lovelace");
        assert_eq!(p.display_name(), "Ada Lovelace (@ada)");
        assert!(!p.excludable);
    }
}
