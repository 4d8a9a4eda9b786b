//! Database row models and their domain conversions.

use chrono::{DateTime, Utc};

use crate::domain::{PlaylistKind, RankedVideo, VideoRecord};
use crate::error::RankerError;

/// A row from the `videos` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoRow {
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
    /// Publication instant.
    pub published_at: DateTime<Utc>,
    /// Most recently ingested view counter.
    pub view_count: i64,
    /// Most recently ingested like counter.
    pub like_count: i64,
    /// Preferred thumbnail URL.
    pub thumbnail_url: String,
    /// Display name of the uploading channel.
    pub owner_channel_title: String,
    /// Playlist the video was drawn from.
    pub playlist_id: String,
    /// Playlist classification, stored lowercase.
    pub playlist_type: String,
    /// Position within the source playlist.
    pub position: i32,
    /// First-observation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-upsert timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<VideoRow> for VideoRecord {
    type Error = RankerError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        let playlist_kind: PlaylistKind = row.playlist_type.parse().map_err(|_| {
            RankerError::PersistenceError(format!(
                "video {} has unknown playlist_type {:?}",
                row.video_id, row.playlist_type
            ))
        })?;
        Ok(Self {
            video_id: row.video_id,
            title: row.title,
            description: row.description,
            channel_id: row.channel_id,
            channel_title: row.channel_title,
            published_at: row.published_at,
            view_count: row.view_count,
            like_count: row.like_count,
            thumbnail_url: row.thumbnail_url,
            owner_channel_title: row.owner_channel_title,
            playlist_id: row.playlist_id,
            playlist_kind,
            position: row.position,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row returned by the `rank_daily` / `rank_weekly` functions: the
/// video columns plus chart placement and windowed growth.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankedVideoRow {
    /// The embedded video columns.
    #[sqlx(flatten)]
    pub video: VideoRow,
    /// 1-based chart position.
    pub rank: i64,
    /// View growth over the window.
    pub view_growth: i64,
    /// Like growth over the window.
    pub like_growth: i64,
}

impl TryFrom<RankedVideoRow> for RankedVideo {
    type Error = RankerError;

    fn try_from(row: RankedVideoRow) -> Result<Self, Self::Error> {
        Ok(Self {
            video: row.video.try_into()?,
            rank: row.rank,
            view_growth: Some(row.view_growth),
            like_growth: Some(row.like_growth),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unreachable)]
mod tests {
    use super::*;

    fn row() -> VideoRow {
        VideoRow {
            video_id: "v1".to_string(),
            title: "Song".to_string(),
            description: String::new(),
            channel_id: "UC1".to_string(),
            channel_title: "Curator".to_string(),
            published_at: Utc::now(),
            view_count: 10,
            like_count: 2,
            thumbnail_url: String::new(),
            owner_channel_title: "Artist".to_string(),
            playlist_id: "PL1".to_string(),
            playlist_type: "cover".to_string(),
            position: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_record() {
        let Ok(record) = VideoRecord::try_from(row()) else {
            panic!("conversion should succeed");
        };
        assert_eq!(record.playlist_kind, PlaylistKind::Cover);
    }

    #[test]
    fn unknown_playlist_type_is_a_persistence_error() {
        let mut bad = row();
        bad.playlist_type = "mashup".to_string();
        assert!(matches!(
            VideoRecord::try_from(bad),
            Err(RankerError::PersistenceError(_))
        ));
    }
}
