//! Domain layer: identifiers and the records the matcher works with.
//!
//! Groups, participants, rounds and pairs. None of these types perform
//! I/O; storage lives in [`crate::persistence`].

pub mod group;
pub mod ids;
pub mod pair;
pub mod participant;
pub mod round;

pub use group::Group;
pub use ids::{GroupId, PairId, ParticipantId, RoundId};
pub use pair::{MetOutcome, Pair};
pub use participant::{Availability, Member, Participant};
pub use round::Round;
