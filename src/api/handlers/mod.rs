//! REST endpoint handlers organized by resource.

pub mod ingest;
pub mod system;
pub mod videos;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().merge(videos::routes()).merge(ingest::routes())
}
