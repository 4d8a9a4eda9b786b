//! Chart query handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ChartQuery, PagedChartQuery};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RankerError};

/// `GET /videos` — Filtered, sorted, searched, paginated chart page.
///
/// # Errors
///
/// Returns [`RankerError`] on invalid parameters or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/videos",
    tag = "Videos",
    summary = "Query the video chart",
    description = "Returns one page of the chart under the requested ranking path. \
                   `total` sorts lifetime counters; `daily`/`weekly` serve the stored \
                   growth rankings.",
    params(ChartQuery),
    responses(
        (status = 200, description = "One chart page", body = crate::domain::VideoPage),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
    )
)]
pub async fn get_videos(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, RankerError> {
    let filters = query.into_filters();
    let page = state.ranking.get_videos(&filters).await?;
    Ok(Json(page))
}

/// `GET /videos/pages` — Page-numbered chart access for infinite
/// scroll consumers.
///
/// # Errors
///
/// Returns [`RankerError`] on invalid parameters or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/videos/pages",
    tag = "Videos",
    summary = "Load a numbered chart page",
    description = "Converts a 1-based page number to an offset and reports the next \
                   page number, or null on the last page.",
    params(PagedChartQuery),
    responses(
        (status = 200, description = "One numbered chart page", body = crate::service::VideoPageCursor),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
    )
)]
pub async fn get_video_page(
    State(state): State<AppState>,
    Query(query): Query<PagedChartQuery>,
) -> Result<impl IntoResponse, RankerError> {
    let (filters, page, limit) = query.into_parts();
    let cursor = state.ranking.load_more(&filters, page, limit).await?;
    Ok(Json(cursor))
}

/// Chart routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(get_videos))
        .route("/videos/pages", get(get_video_page))
}
