//! Upstream playlist metadata source.
//!
//! [`PlaylistSource`] is the seam between the ingestion pipeline and
//! the external metadata API. The production implementation is
//! [`youtube::YouTubeSource`]; tests substitute fixture sources.

pub mod types;
pub mod youtube;

use async_trait::async_trait;

use crate::error::RankerError;
use types::{PlaylistPage, StatsEntry};

/// Maximum entries per catalog page, and the bound on the id list a
/// single statistics call accepts.
pub const PAGE_SIZE: usize = 50;

/// Typed collaborator wrapping the paginated metadata + statistics API.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Fetches one page of catalog entries for the given playlist.
    ///
    /// Pages within one playlist form a cursor chain: pass the
    /// `next_page_token` of the previous page, or `None` for the first.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::SourceFetch`] on network failure or a
    /// non-2xx upstream status.
    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, RankerError>;

    /// Fetches current statistics for the given video ids in one call.
    ///
    /// The id list must not exceed [`PAGE_SIZE`]; one catalog page
    /// always fits.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::SourceFetch`] on network failure or a
    /// non-2xx upstream status.
    async fn video_statistics(&self, ids: &[String]) -> Result<Vec<StatsEntry>, RankerError>;
}
