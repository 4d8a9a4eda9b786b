//! Video records, daily snapshots, and ranked rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::playlist::PlaylistKind;

/// A freshly mapped video as produced by one ingestion run, before the
/// store assigns timestamps.
///
/// One `NewVideo` is built per catalog/statistics pair; the store
/// upserts it by `video_id`, replacing every field except the original
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    /// Source-assigned video identity, stable across runs.
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Full description text.
    pub description: String,
    /// Channel that owns the playlist entry.
    pub channel_id: String,
    /// Display name of that channel.
    pub channel_title: String,
    /// Publication instant reported by the source.
    pub published_at: DateTime<Utc>,
    /// View counter at ingestion time.
    pub view_count: i64,
    /// Like counter at ingestion time; zero when the source omits it.
    pub like_count: i64,
    /// Preferred thumbnail URL.
    pub thumbnail_url: String,
    /// Display name of the channel that uploaded the video itself.
    pub owner_channel_title: String,
    /// Playlist the video was drawn from.
    pub playlist_id: String,
    /// Classification of that playlist.
    pub playlist_kind: PlaylistKind,
    /// Position within the source playlist.
    pub position: i32,
}

/// A persisted video row.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VideoRecord {
    /// Source-assigned video identity (primary key).
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Full description text.
    pub description: String,
    /// Channel that owns the playlist entry.
    pub channel_id: String,
    /// Display name of that channel.
    pub channel_title: String,
    /// Publication instant reported by the source.
    pub published_at: DateTime<Utc>,
    /// Most recently ingested view counter.
    pub view_count: i64,
    /// Most recently ingested like counter.
    pub like_count: i64,
    /// Preferred thumbnail URL.
    pub thumbnail_url: String,
    /// Display name of the channel that uploaded the video itself.
    pub owner_channel_title: String,
    /// Playlist the video was drawn from.
    pub playlist_id: String,
    /// Classification of that playlist.
    pub playlist_kind: PlaylistKind,
    /// Position within the source playlist.
    pub position: i32,
    /// First time any ingestion run observed this video. Never
    /// overwritten by later runs.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent upsert.
    pub updated_at: DateTime<Utc>,
}

/// A point-in-time capture of one video's counters for one calendar day.
///
/// The calendar day is computed in the fixed snapshot zone (see
/// [`crate::ingest::snapshot::SNAPSHOT_TZ`]), and the pair
/// `(video_id, snapshot_date)` is unique: history is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySnapshot {
    /// Video the counters belong to.
    pub video_id: String,
    /// View counter at capture time.
    pub view_count: i64,
    /// Like counter at capture time.
    pub like_count: i64,
    /// Calendar day of the capture in the snapshot zone.
    pub snapshot_date: NaiveDate,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A video row paired with its chart placement.
///
/// Total-rank queries derive `rank` from the requested sort order;
/// daily/weekly rows come back from the stored ranking functions with
/// the windowed counter growth attached.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RankedVideo {
    /// The underlying video row.
    #[serde(flatten)]
    pub video: VideoRecord,
    /// 1-based chart position under the requested ordering.
    pub rank: i64,
    /// View growth over the ranking window; absent for total rank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_growth: Option<i64>,
    /// Like growth over the ranking window; absent for total rank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_growth: Option<i64>,
}
