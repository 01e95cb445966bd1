//! # pool-matcher
//!
//! Pairs the members of chat groups into one-on-one meetups, one round at
//! a time, steering away from people who have already been paired.
//!
//! ## Architecture
//!
//! ```text
//! Operators (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PairingService / RoundService / DirectoryService / StatsService (service/)
//!     │       │
//!     │       ├── Eligibility → Greedy pairing → Swap repair (matching/)
//!     │       │       └── HistoryIndex
//!     │       │
//!     │       ├── MatchStore: in-memory or PostgreSQL (persistence/)
//!     │       └── Notifier: logging, recording, retrying (notify/)
//!     │
//!     └── Domain types (domain/)
//! ```
//!
//! The matching engine in [`matching`] is pure and synchronous. All I/O
//! happens in [`service`], which persists pairs first and then introduces
//! each one through the injected [`notify::Notifier`].

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod matching;
pub mod notify;
pub mod persistence;
pub mod service;
