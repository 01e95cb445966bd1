//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::MatcherConfig;
use crate::notify::Notifier;
use crate::persistence::MatchStore;
use crate::service::{
    DirectoryService, PairingOptions, PairingService, RoundService, StatsService,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Groups, participants and membership.
    pub directory: Arc<DirectoryService>,
    /// Round lifecycle and meeting outcomes.
    pub rounds: Arc<RoundService>,
    /// Pairing runs.
    pub pairing: Arc<PairingService>,
    /// Per-group figures.
    pub stats: Arc<StatsService>,
}

impl AppState {
    /// Wires all services to one store and one notifier.
    #[must_use]
    pub fn new(
        store: Arc<dyn MatchStore>,
        notifier: Arc<dyn Notifier>,
        config: &MatcherConfig,
    ) -> Self {
        Self {
            directory: Arc::new(DirectoryService::new(Arc::clone(&store))),
            stats: Arc::new(StatsService::new(Arc::clone(&store))),
            rounds: Arc::new(RoundService::new(
                Arc::clone(&store),
                Arc::clone(&notifier),
                config.round_length_days,
            )),
            pairing: Arc::new(PairingService::new(
                store,
                notifier,
                PairingOptions::from_config(config),
            )),
        }
    }
}
