//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::ingest::IngestionPipeline;
use crate::service::RankingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chart query service.
    pub ranking: Arc<RankingService>,
    /// Ingestion pipeline, triggered by the scheduler endpoint.
    pub pipeline: Arc<IngestionPipeline>,
}
