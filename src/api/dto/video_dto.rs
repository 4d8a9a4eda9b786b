//! Chart query parameters and response DTOs.

use serde::Deserialize;

use crate::domain::{
    DEFAULT_LIMIT, PlaylistFilter, RankKind, SortKey, VideoFilters,
};

/// Default page size for the page-numbered endpoint, matching the
/// infinite-scroll consumer.
const PAGED_LIMIT: u32 = 30;

/// Query parameters for `GET /videos`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[serde(default)]
pub struct ChartQuery {
    /// Playlist-kind filter (`all`, `original`, `cover`).
    pub playlist_type: PlaylistFilter,
    /// Sort key for the total path (`views`, `likes`, `date`).
    pub sort_by: SortKey,
    /// Ranking path (`total`, `daily`, `weekly`).
    pub rank_type: RankKind,
    /// Maximum rows to return (clamped to 100).
    pub limit: u32,
    /// Leading rows to skip.
    pub offset: u32,
    /// Case-insensitive substring over title or owner channel title.
    pub search: Option<String>,
}

impl Default for ChartQuery {
    fn default() -> Self {
        Self {
            playlist_type: PlaylistFilter::All,
            sort_by: SortKey::Views,
            rank_type: RankKind::Total,
            limit: DEFAULT_LIMIT,
            offset: 0,
            search: None,
        }
    }
}

impl ChartQuery {
    /// Converts the wire parameters into domain filters, clamping the
    /// limit and dropping an all-whitespace search term.
    #[must_use]
    pub fn into_filters(self) -> VideoFilters {
        VideoFilters {
            playlist: self.playlist_type,
            sort: self.sort_by,
            rank: self.rank_type,
            limit: self.limit.clamp(1, 100),
            offset: self.offset,
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Query parameters for `GET /videos/pages`.
///
/// Flat field list rather than a nested [`ChartQuery`]: axum's query
/// extractor cannot see through `serde(flatten)` for numeric fields.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[serde(default)]
pub struct PagedChartQuery {
    /// Playlist-kind filter (`all`, `original`, `cover`).
    pub playlist_type: PlaylistFilter,
    /// Sort key for the total path (`views`, `likes`, `date`).
    pub sort_by: SortKey,
    /// Ranking path (`total`, `daily`, `weekly`).
    pub rank_type: RankKind,
    /// Rows per page (clamped to 100).
    pub limit: u32,
    /// 1-based page number.
    pub page: u32,
    /// Case-insensitive substring over title or owner channel title.
    pub search: Option<String>,
}

impl Default for PagedChartQuery {
    fn default() -> Self {
        Self {
            playlist_type: PlaylistFilter::All,
            sort_by: SortKey::Views,
            rank_type: RankKind::Total,
            limit: PAGED_LIMIT,
            page: 1,
            search: None,
        }
    }
}

impl PagedChartQuery {
    /// Splits the wire parameters into domain filters plus the page
    /// addressing pair.
    #[must_use]
    pub fn into_parts(self) -> (VideoFilters, u32, u32) {
        let limit = self.limit.clamp(1, 100);
        let filters = VideoFilters {
            playlist: self.playlist_type,
            sort: self.sort_by,
            rank: self.rank_type,
            limit,
            offset: 0,
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };
        (filters, self.page, limit)
    }
}
