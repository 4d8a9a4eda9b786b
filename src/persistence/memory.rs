//! In-memory [`VideoStore`] for tests and local runs without a database.
//!
//! Mirrors the PostgreSQL semantics closely enough for the pipeline and
//! query service to be exercised end to end: upserts preserve
//! `created_at`, snapshot writes honor the `(video_id, snapshot_date)`
//! conflict behavior, and the ranked views derive growth from the
//! stored snapshots.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::RwLock;

use super::VideoStore;
use crate::domain::{
    DailySnapshot, NewVideo, PlaylistKind, RankWindow, RankedVideo, VideoFilters, VideoRecord,
};
use crate::error::RankerError;
use crate::ingest::snapshot::snapshot_day;

/// Hash-map backed store guarded by a single [`RwLock`] per table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    videos: RwLock<HashMap<String, VideoRecord>>,
    snapshots: RwLock<HashMap<(String, NaiveDate), DailySnapshot>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored record for a video id, if any.
    pub async fn video(&self, video_id: &str) -> Option<VideoRecord> {
        self.videos.read().await.get(video_id).cloned()
    }

    /// Returns the number of stored snapshot rows.
    pub async fn snapshot_count(&self) -> usize {
        self.snapshots.read().await.len()
    }

    /// Seeds a snapshot row directly, bypassing the conflict gate.
    pub async fn seed_snapshot(&self, snapshot: DailySnapshot) {
        self.snapshots.write().await.insert(
            (snapshot.video_id.clone(), snapshot.snapshot_date),
            snapshot,
        );
    }
}

fn matches_search(record: &VideoRecord, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    record.title.to_lowercase().contains(&needle)
        || record.owner_channel_title.to_lowercase().contains(&needle)
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn upsert_videos(&self, videos: &[NewVideo]) -> Result<u64, RankerError> {
        let now = Utc::now();
        let mut map = self.videos.write().await;
        for video in videos {
            let created_at = map
                .get(&video.video_id)
                .map_or(now, |existing| existing.created_at);
            map.insert(
                video.video_id.clone(),
                VideoRecord {
                    video_id: video.video_id.clone(),
                    title: video.title.clone(),
                    description: video.description.clone(),
                    channel_id: video.channel_id.clone(),
                    channel_title: video.channel_title.clone(),
                    published_at: video.published_at,
                    view_count: video.view_count,
                    like_count: video.like_count,
                    thumbnail_url: video.thumbnail_url.clone(),
                    owner_channel_title: video.owner_channel_title.clone(),
                    playlist_id: video.playlist_id.clone(),
                    playlist_kind: video.playlist_kind,
                    position: video.position,
                    created_at,
                    updated_at: now,
                },
            );
        }
        Ok(videos.len() as u64)
    }

    async fn has_snapshots_for(&self, day: NaiveDate) -> Result<bool, RankerError> {
        Ok(self
            .snapshots
            .read()
            .await
            .keys()
            .any(|(_, date)| *date == day))
    }

    async fn upsert_snapshots(
        &self,
        day: NaiveDate,
        videos: &[NewVideo],
        overwrite: bool,
    ) -> Result<u64, RankerError> {
        let now = Utc::now();
        let mut map = self.snapshots.write().await;
        let mut written = 0u64;
        for video in videos {
            let key = (video.video_id.clone(), day);
            if map.contains_key(&key) && !overwrite {
                continue;
            }
            map.insert(
                key,
                DailySnapshot {
                    video_id: video.video_id.clone(),
                    view_count: video.view_count,
                    like_count: video.like_count,
                    snapshot_date: day,
                    created_at: now,
                },
            );
            written += 1;
        }
        Ok(written)
    }

    async fn query_videos(
        &self,
        filters: &VideoFilters,
    ) -> Result<(Vec<VideoRecord>, u64), RankerError> {
        let map = self.videos.read().await;
        let mut matched: Vec<VideoRecord> = map
            .values()
            .filter(|record| {
                filters
                    .playlist
                    .kind()
                    .is_none_or(|kind| record.playlist_kind == kind)
            })
            .filter(|record| {
                filters
                    .search
                    .as_deref()
                    .is_none_or(|needle| matches_search(record, needle))
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match filters.sort {
                crate::domain::SortKey::Views => b.view_count.cmp(&a.view_count),
                crate::domain::SortKey::Likes => b.like_count.cmp(&a.like_count),
                crate::domain::SortKey::Date => b.published_at.cmp(&a.published_at),
            };
            ordering.then_with(|| a.video_id.cmp(&b.video_id))
        });

        let total = matched.len() as u64;
        let page: Vec<VideoRecord> = matched
            .into_iter()
            .skip(filters.offset as usize)
            .take(filters.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn ranked_videos(
        &self,
        window: RankWindow,
        kind: Option<PlaylistKind>,
    ) -> Result<Vec<RankedVideo>, RankerError> {
        let span = match window {
            RankWindow::Daily => Duration::days(1),
            RankWindow::Weekly => Duration::days(7),
        };
        let today = snapshot_day(Utc::now());
        let window_start = today - span;

        let videos = self.videos.read().await;
        let snapshots = self.snapshots.read().await;

        let mut ranked: Vec<RankedVideo> = videos
            .values()
            .filter(|record| kind.is_none_or(|k| record.playlist_kind == k))
            .filter_map(|record| {
                // Baseline is the oldest snapshot inside the window;
                // videos without one are absent from the chart, like
                // the SQL functions' inner join.
                let baseline = snapshots
                    .values()
                    .filter(|s| s.video_id == record.video_id)
                    .filter(|s| s.snapshot_date >= window_start && s.snapshot_date <= today)
                    .min_by_key(|s| s.snapshot_date)?;
                Some(RankedVideo {
                    video: record.clone(),
                    rank: 0,
                    view_growth: Some(record.view_count - baseline.view_count),
                    like_growth: Some(record.like_count - baseline.like_count),
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.view_growth
                .cmp(&a.view_growth)
                .then_with(|| a.video.video_id.cmp(&b.video.video_id))
        });
        for (index, entry) in ranked.iter_mut().enumerate() {
            entry.rank = index as i64 + 1;
        }
        Ok(ranked)
    }
}
