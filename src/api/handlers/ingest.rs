//! Ingestion trigger handler: the adapter the external scheduler hits.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::{ErrorResponse, RankerError};

/// Response body for a completed ingestion run.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    /// Always `true` on a 200; failures return the error shape instead.
    pub success: bool,
    /// Human-readable completion message.
    pub message: String,
    /// Number of videos ingested.
    pub count: usize,
    /// Number of snapshot rows written for the day.
    pub snapshot_count: u64,
}

/// `POST /ingest/run` — Runs one full ingestion pass.
///
/// The scheduler treats any non-200 as a failed run; the pipeline's
/// fail-fast error surfaces here as a structured 500/502 body.
///
/// # Errors
///
/// Returns [`RankerError`] when any fetch, join, mapping, or write
/// step fails.
#[utoipa::path(
    post,
    path = "/api/v1/ingest/run",
    tag = "Ingestion",
    summary = "Trigger an ingestion run",
    description = "Fetches every configured playlist, upserts the catalog, and writes \
                   the day's snapshots subject to the snapshot policy.",
    responses(
        (status = 200, description = "Run completed", body = IngestResponse),
        (status = 500, description = "Run failed", body = ErrorResponse),
        (status = 502, description = "Upstream fetch failed", body = ErrorResponse),
    )
)]
pub async fn run_ingestion(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RankerError> {
    let report = state.pipeline.run().await?;
    Ok(Json(IngestResponse {
        success: true,
        message: "video data updated successfully".to_string(),
        count: report.video_count,
        snapshot_count: report.snapshot_count,
    }))
}

/// Ingestion routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ingest/run", post(run_ingestion))
}
