//! REST endpoint handlers organized by resource.

pub mod groups;
pub mod pairs;
pub mod participants;
pub mod rounds;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(groups::routes())
        .merge(participants::routes())
        .merge(rounds::routes())
        .merge(pairs::routes())
}
