//! Pure transform from catalog + statistics entries to [`NewVideo`].

use crate::domain::{NewVideo, PlaylistKind};
use crate::error::RankerError;
use crate::source::types::{CatalogEntry, StatsEntry};

/// Builds a [`NewVideo`] from one catalog entry and its statistics.
///
/// The view counter is the primary ranking signal: a missing or
/// non-numeric `view_count` is fatal rather than silently zeroed. A
/// missing or non-numeric `like_count` maps to 0, matching the
/// upstream behavior for videos whose uploader hides likes.
///
/// # Errors
///
/// Returns [`RankerError::Mapping`] when `view_count` is absent or not
/// a base-10 integer.
pub fn map_video(
    catalog: CatalogEntry,
    stats: &StatsEntry,
    kind: PlaylistKind,
    playlist_id: &str,
) -> Result<NewVideo, RankerError> {
    let view_count = stats
        .view_count
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok())
        .ok_or_else(|| {
            RankerError::Mapping(format!(
                "video {}: view_count missing or non-numeric ({:?})",
                stats.video_id, stats.view_count
            ))
        })?;

    let like_count = stats
        .like_count
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(0);

    Ok(NewVideo {
        video_id: catalog.video_id,
        title: catalog.title,
        description: catalog.description,
        channel_id: catalog.channel_id,
        channel_title: catalog.channel_title,
        published_at: catalog.published_at,
        view_count,
        like_count,
        thumbnail_url: catalog.thumbnail_url,
        owner_channel_title: catalog.owner_channel_title,
        playlist_id: playlist_id.to_string(),
        playlist_kind: kind,
        position: catalog.position,
    })
}
