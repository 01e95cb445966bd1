//! Service layer: business logic orchestration.
//!
//! [`PairingService`] runs the matching engine for a round, persists the
//! pairs and introduces them. [`RoundService`] opens rounds and records
//! meeting outcomes. [`DirectoryService`] manages groups and participants.
//! [`StatsService`] reports per-group meetup figures.

pub mod directory_service;
pub mod pairing_service;
pub mod round_service;
pub mod stats_service;

pub use directory_service::{DirectoryService, NewParticipant};
pub use pairing_service::{PairingOptions, PairingReport, PairingService};
pub use round_service::{RoundOpened, RoundService};
pub use stats_service::{GroupStats, LeaderboardEntry, StatsService};
