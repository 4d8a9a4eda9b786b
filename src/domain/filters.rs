//! Query filters and paged results for the ranking views.

use serde::{Deserialize, Serialize};

use super::playlist::PlaylistKind;
use super::video::RankedVideo;

/// Default page size for chart queries.
pub const DEFAULT_LIMIT: u32 = 50;

/// Playlist-kind filter applied to every ranking view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistFilter {
    /// No playlist filtering.
    #[default]
    All,
    /// Only first-party uploads.
    Original,
    /// Only cover performances.
    Cover,
}

impl PlaylistFilter {
    /// Returns the playlist kind this filter selects, or `None` for
    /// [`PlaylistFilter::All`].
    #[must_use]
    pub const fn kind(&self) -> Option<PlaylistKind> {
        match self {
            Self::All => None,
            Self::Original => Some(PlaylistKind::Original),
            Self::Cover => Some(PlaylistKind::Cover),
        }
    }
}

/// Sort key for total-rank queries. Always descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Order by lifetime view count.
    #[default]
    Views,
    /// Order by lifetime like count.
    Likes,
    /// Order by publication instant.
    Date,
}

impl SortKey {
    /// Returns the underlying column this key sorts on.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Views => "view_count",
            Self::Likes => "like_count",
            Self::Date => "published_at",
        }
    }
}

/// Time window of a stored ranking function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankWindow {
    /// Growth since the previous daily snapshot.
    Daily,
    /// Growth over the trailing seven days of snapshots.
    Weekly,
}

/// Selects whether a query uses raw sorted totals or a precomputed
/// windowed ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RankKind {
    /// Exact totals ordered by the requested sort key.
    #[default]
    Total,
    /// Daily growth ranking from the stored function.
    Daily,
    /// Weekly growth ranking from the stored function.
    Weekly,
}

impl RankKind {
    /// Returns the ranking window, or `None` for the total path.
    #[must_use]
    pub const fn window(&self) -> Option<RankWindow> {
        match self {
            Self::Total => None,
            Self::Daily => Some(RankWindow::Daily),
            Self::Weekly => Some(RankWindow::Weekly),
        }
    }
}

/// Filter, sort, search, and pagination parameters for a chart query.
#[derive(Debug, Clone)]
pub struct VideoFilters {
    /// Playlist-kind filter.
    pub playlist: PlaylistFilter,
    /// Sort key (total rank only; windowed ranks carry their own order).
    pub sort: SortKey,
    /// Ranking path selector.
    pub rank: RankKind,
    /// Maximum number of rows to return.
    pub limit: u32,
    /// Number of leading rows to skip.
    pub offset: u32,
    /// Case-insensitive substring matched against title or owner
    /// channel title.
    pub search: Option<String>,
}

impl Default for VideoFilters {
    fn default() -> Self {
        Self {
            playlist: PlaylistFilter::All,
            sort: SortKey::Views,
            rank: RankKind::Total,
            limit: DEFAULT_LIMIT,
            offset: 0,
            search: None,
        }
    }
}

/// One page of chart results.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct VideoPage {
    /// The rows of this page, in rank order.
    pub videos: Vec<RankedVideo>,
    /// Exact number of rows matching the filters.
    pub total_count: u64,
    /// Whether `offset + limit` still lies inside the result set.
    pub has_more: bool,
}

impl VideoPage {
    /// Computes the uniform `has_more` predicate shared by both ranking
    /// paths.
    #[must_use]
    pub fn more_after(offset: u32, limit: u32, total: u64) -> bool {
        u64::from(offset) + u64::from(limit) < total
    }
}
