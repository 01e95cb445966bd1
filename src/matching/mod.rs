//! Round pairing engine.
//!
//! Pure, synchronous computation with no I/O:
//!
//! ```text
//! members ──► select_eligible ──► ordered ids ──► pair_participants ──► pairs
//!                                                      ▲
//!                              pair history ──► HistoryIndex
//! ```
//!
//! Randomness is injected by the caller so replays with a fixed seed give
//! identical rounds.

pub mod eligibility;
pub mod greedy;
pub mod history;
pub mod repair;

pub use eligibility::{Candidate, Eligibility, select_eligible};
pub use greedy::{ProposedPair, pair_participants};
pub use history::HistoryIndex;
pub use repair::repair_forced_duplicates;
