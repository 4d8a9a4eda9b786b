//! Persistence layer: video catalog, daily snapshots, ranking queries.
//!
//! [`VideoStore`] is the gateway the pipeline and query service talk
//! to. The production implementation is [`postgres::PostgresStore`];
//! [`memory::MemoryStore`] backs tests and API-key-less local runs.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{NewVideo, PlaylistKind, RankWindow, RankedVideo, VideoFilters, VideoRecord};
use crate::error::RankerError;

/// Store gateway for ingestion writes and ranking queries.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Upserts the given videos by `video_id`.
    ///
    /// A conflicting row has every field replaced except `created_at`;
    /// `updated_at` is bumped. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::PersistenceError`] on store failure.
    async fn upsert_videos(&self, videos: &[NewVideo]) -> Result<u64, RankerError>;

    /// Returns whether any snapshot rows exist for the given day.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::PersistenceError`] on store failure.
    async fn has_snapshots_for(&self, day: NaiveDate) -> Result<bool, RankerError>;

    /// Writes one snapshot row per video for the given day.
    ///
    /// Conflict target is `(video_id, snapshot_date)`: with `overwrite`
    /// the counters are replaced, without it existing rows are left
    /// untouched. Returns the number of rows actually written, which
    /// under a lost first-writer race may be less than `videos.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::PersistenceError`] on store failure.
    async fn upsert_snapshots(
        &self,
        day: NaiveDate,
        videos: &[NewVideo],
        overwrite: bool,
    ) -> Result<u64, RankerError>;

    /// Runs the filtered, sorted, paginated total-rank query.
    ///
    /// Applies the playlist-kind filter and the case-insensitive
    /// substring search over title and owner channel title, orders by
    /// the requested metric descending with `video_id` as the stable
    /// tie-break, and returns the page rows plus the exact total count.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::PersistenceError`] on store failure.
    async fn query_videos(
        &self,
        filters: &VideoFilters,
    ) -> Result<(Vec<VideoRecord>, u64), RankerError>;

    /// Retrieves the full ranked set from the stored ranking function
    /// for the given window, optionally filtered by playlist kind
    /// (`None` means no filter).
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::PersistenceError`] on store failure.
    async fn ranked_videos(
        &self,
        window: RankWindow,
        kind: Option<PlaylistKind>,
    ) -> Result<Vec<RankedVideo>, RankerError>;
}
