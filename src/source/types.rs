//! Wire types for the upstream metadata API.
//!
//! Raw response shapes deserialize here and are immediately narrowed to
//! [`CatalogEntry`] / [`StatsEntry`]; nothing outside this module sees
//! the nested snippet layout. Statistics counters arrive string-encoded.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Metadata describing one playlist item, independent of live counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Source-assigned video identity.
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
    /// Preferred thumbnail URL.
    pub thumbnail_url: String,
    /// Display name of the channel that uploaded the video itself.
    pub owner_channel_title: String,
    /// Position within the source playlist.
    pub position: i32,
}

/// One page of catalog entries plus the cursor to the next page.
#[derive(Debug, Clone)]
pub struct PlaylistPage {
    /// Catalog entries of this page, at most [`super::PAGE_SIZE`].
    pub entries: Vec<CatalogEntry>,
    /// Opaque cursor to the next page, or `None` on the last page.
    pub next_page_token: Option<String>,
}

/// Mutable engagement counters for one video identity.
///
/// Counters are kept in their string encoding here; parsing (and the
/// missing-like-count default) is the mapper's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsEntry {
    /// Video the counters belong to.
    pub video_id: String,
    /// String-encoded view counter; the source may omit it for
    /// unavailable videos.
    pub view_count: Option<String>,
    /// String-encoded like counter; omitted when the uploader hides it.
    pub like_count: Option<String>,
}

// ── Raw upstream payloads ───────────────────────────────────────────────

/// `playlistItems.list` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Snippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "channelId")]
    pub channel_id: String,
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
    #[serde(rename = "videoOwnerChannelTitle", default)]
    pub video_owner_channel_title: String,
    pub position: i32,
    pub thumbnails: Thumbnails,
    #[serde(rename = "resourceId")]
    pub resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Thumbnails {
    pub high: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

impl Thumbnails {
    /// Picks the preferred thumbnail variant: `high`, then `medium`,
    /// then `default`.
    pub(crate) fn preferred_url(&self) -> String {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }
}

/// `videos.list?part=statistics` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub statistics: Statistics,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Statistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
}

impl From<PlaylistItem> for CatalogEntry {
    fn from(item: PlaylistItem) -> Self {
        let snippet = item.snippet;
        Self {
            video_id: snippet.resource_id.video_id,
            title: snippet.title,
            description: snippet.description,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            published_at: snippet.published_at,
            thumbnail_url: snippet.thumbnails.preferred_url(),
            owner_channel_title: snippet.video_owner_channel_title,
            position: snippet.position,
        }
    }
}

impl From<VideoItem> for StatsEntry {
    fn from(item: VideoItem) -> Self {
        Self {
            video_id: item.id,
            view_count: item.statistics.view_count,
            like_count: item.statistics.like_count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unreachable)]
mod tests {
    use super::*;

    #[test]
    fn playlist_item_deserializes_and_narrows() {
        let raw = serde_json::json!({
            "snippet": {
                "title": "Song A",
                "description": "desc",
                "channelId": "UC1",
                "channelTitle": "Curator",
                "publishedAt": "2024-03-01T09:00:00Z",
                "videoOwnerChannelTitle": "Artist",
                "position": 3,
                "thumbnails": {
                    "high": { "url": "https://img/hq.jpg" },
                    "default": { "url": "https://img/default.jpg" }
                },
                "resourceId": { "videoId": "vid-1" }
            }
        });
        let Ok(item) = serde_json::from_value::<PlaylistItem>(raw) else {
            panic!("playlist item should deserialize");
        };
        let entry = CatalogEntry::from(item);
        assert_eq!(entry.video_id, "vid-1");
        assert_eq!(entry.thumbnail_url, "https://img/hq.jpg");
        assert_eq!(entry.owner_channel_title, "Artist");
        assert_eq!(entry.position, 3);
    }

    #[test]
    fn thumbnail_falls_back_when_high_is_missing() {
        let raw = serde_json::json!({
            "medium": { "url": "https://img/mq.jpg" }
        });
        let Ok(thumbs) = serde_json::from_value::<Thumbnails>(raw) else {
            panic!("thumbnails should deserialize");
        };
        assert_eq!(thumbs.preferred_url(), "https://img/mq.jpg");
    }

    #[test]
    fn statistics_keep_string_encoding() {
        let raw = serde_json::json!({
            "id": "vid-1",
            "statistics": { "viewCount": "1000" }
        });
        let Ok(item) = serde_json::from_value::<VideoItem>(raw) else {
            panic!("video item should deserialize");
        };
        let stats = StatsEntry::from(item);
        assert_eq!(stats.view_count.as_deref(), Some("1000"));
        assert_eq!(stats.like_count, None);
    }
}
