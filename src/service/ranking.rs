//! Chart query service: filtering, search, pagination, and the two
//! ranking paths.

use std::sync::Arc;

use crate::domain::{RankedVideo, VideoFilters, VideoPage};
use crate::error::RankerError;
use crate::persistence::VideoStore;

/// A page addressed by 1-based page number rather than offset.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct VideoPageCursor {
    /// The underlying page.
    #[serde(flatten)]
    pub page: VideoPage,
    /// Next page number, or `None` on the last page.
    pub next_page: Option<u32>,
}

/// Serves filtered, sorted, searched, and paginated ranking views.
///
/// The total path pushes filtering, ordering, and pagination into the
/// store and returns its exact count. The daily/weekly paths retrieve
/// the full ranked set from the stored ranking functions and paginate
/// in memory — the ranked set must fit in memory, a deliberate
/// simplification until the functions accept pagination parameters.
pub struct RankingService {
    store: Arc<dyn VideoStore>,
}

impl std::fmt::Debug for RankingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingService").finish_non_exhaustive()
    }
}

impl RankingService {
    /// Creates a service over the given store gateway.
    #[must_use]
    pub fn new(store: Arc<dyn VideoStore>) -> Self {
        Self { store }
    }

    /// Runs a chart query and normalizes the result into a uniform
    /// page.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::InvalidRequest`] for a zero limit, or the
    /// store's error unchanged.
    pub async fn get_videos(&self, filters: &VideoFilters) -> Result<VideoPage, RankerError> {
        if filters.limit == 0 {
            return Err(RankerError::InvalidRequest(
                "limit must be positive".to_string(),
            ));
        }

        match filters.rank.window() {
            None => self.total_page(filters).await,
            Some(window) => {
                let ranked = self
                    .store
                    .ranked_videos(window, filters.playlist.kind())
                    .await?;
                Ok(Self::slice_ranked(ranked, filters))
            }
        }
    }

    /// Page-number sugar over [`RankingService::get_videos`]: converts
    /// a 1-based page to an offset and reports the next page number.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::InvalidRequest`] for page 0; underlying
    /// query errors propagate with their original cause intact.
    pub async fn load_more(
        &self,
        filters: &VideoFilters,
        page: u32,
        limit: u32,
    ) -> Result<VideoPageCursor, RankerError> {
        if page == 0 {
            return Err(RankerError::InvalidRequest(
                "page numbers start at 1".to_string(),
            ));
        }
        let paged = VideoFilters {
            limit,
            offset: (page - 1) * limit,
            ..filters.clone()
        };
        let result = self.get_videos(&paged).await?;
        let next_page = result.has_more.then_some(page + 1);
        Ok(VideoPageCursor {
            page: result,
            next_page,
        })
    }

    async fn total_page(&self, filters: &VideoFilters) -> Result<VideoPage, RankerError> {
        let (videos, total_count) = self.store.query_videos(filters).await?;
        let ranked = videos
            .into_iter()
            .enumerate()
            .map(|(index, video)| RankedVideo {
                video,
                rank: i64::from(filters.offset) + index as i64 + 1,
                view_growth: None,
                like_growth: None,
            })
            .collect();
        Ok(VideoPage {
            videos: ranked,
            total_count,
            has_more: VideoPage::more_after(filters.offset, filters.limit, total_count),
        })
    }

    /// Applies the search contract and the `[offset, offset+limit)`
    /// slice to a fully materialized ranked set.
    fn slice_ranked(ranked: Vec<RankedVideo>, filters: &VideoFilters) -> VideoPage {
        let filtered: Vec<RankedVideo> = match filters.search.as_deref() {
            None => ranked,
            Some(needle) => {
                let needle = needle.to_lowercase();
                ranked
                    .into_iter()
                    .filter(|entry| {
                        entry.video.title.to_lowercase().contains(&needle)
                            || entry
                                .video
                                .owner_channel_title
                                .to_lowercase()
                                .contains(&needle)
                    })
                    .collect()
            }
        };

        let total_count = filtered.len() as u64;
        let videos: Vec<RankedVideo> = filtered
            .into_iter()
            .skip(filters.offset as usize)
            .take(filters.limit as usize)
            .collect();
        VideoPage {
            videos,
            total_count,
            has_more: VideoPage::more_after(filters.offset, filters.limit, total_count),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unreachable)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::domain::{DailySnapshot, NewVideo, PlaylistFilter, PlaylistKind, RankKind, SortKey};
    use crate::ingest::snapshot::snapshot_day;
    use crate::persistence::memory::MemoryStore;

    fn new_video(id: &str, views: i64, kind: PlaylistKind) -> NewVideo {
        let Some(published) = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single() else {
            unreachable!()
        };
        NewVideo {
            video_id: id.to_string(),
            title: format!("Song {id}"),
            description: String::new(),
            channel_id: "UC1".to_string(),
            channel_title: "Curator".to_string(),
            published_at: published,
            view_count: views,
            like_count: views / 10,
            thumbnail_url: String::new(),
            owner_channel_title: "Artist".to_string(),
            playlist_id: "PL1".to_string(),
            playlist_kind: kind,
            position: 0,
        }
    }

    async fn seeded_store(count: i64) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let videos: Vec<NewVideo> = (0..count)
            .map(|i| {
                new_video(
                    &format!("v{i:03}"),
                    1000 - i,
                    if i % 2 == 0 {
                        PlaylistKind::Original
                    } else {
                        PlaylistKind::Cover
                    },
                )
            })
            .collect();
        let Ok(_) = store.upsert_videos(&videos).await else {
            panic!("seed should succeed");
        };
        store
    }

    #[tokio::test]
    async fn total_path_reports_exact_count_and_rank() {
        let store = seeded_store(5).await;
        let service = RankingService::new(store);

        let filters = VideoFilters {
            limit: 2,
            offset: 2,
            ..VideoFilters::default()
        };
        let Ok(page) = service.get_videos(&filters).await else {
            panic!("query should succeed");
        };
        assert_eq!(page.total_count, 5);
        assert!(page.has_more);
        let ranks: Vec<i64> = page.videos.iter().map(|v| v.rank).collect();
        assert_eq!(ranks, vec![3, 4]);
    }

    #[tokio::test]
    async fn playlist_filter_narrows_the_total_path() {
        let store = seeded_store(6).await;
        let service = RankingService::new(store);

        let filters = VideoFilters {
            playlist: PlaylistFilter::Cover,
            ..VideoFilters::default()
        };
        let Ok(page) = service.get_videos(&filters).await else {
            panic!("query should succeed");
        };
        assert_eq!(page.total_count, 3);
        assert!(
            page.videos
                .iter()
                .all(|v| v.video.playlist_kind == PlaylistKind::Cover)
        );
    }

    #[tokio::test]
    async fn load_more_pages_are_disjoint_and_ordered() {
        let store = seeded_store(70).await;
        let service = RankingService::new(store);
        let filters = VideoFilters::default();

        let Ok(first) = service.load_more(&filters, 1, 30).await else {
            panic!("page 1 should succeed");
        };
        assert_eq!(first.next_page, Some(2));

        let Some(next) = first.next_page else {
            panic!("next page expected");
        };
        let Ok(second) = service.load_more(&filters, next, 30).await else {
            panic!("page 2 should succeed");
        };

        let first_ids: Vec<String> = first
            .page
            .videos
            .iter()
            .map(|v| v.video.video_id.clone())
            .collect();
        let second_ids: Vec<String> = second
            .page
            .videos
            .iter()
            .map(|v| v.video.video_id.clone())
            .collect();
        assert!(first_ids.iter().all(|id| !second_ids.contains(id)));

        // Concatenation preserves the total descending view order.
        let mut views: Vec<i64> = first
            .page
            .videos
            .iter()
            .chain(second.page.videos.iter())
            .map(|v| v.video.view_count)
            .collect();
        let sorted = {
            let mut copy = views.clone();
            copy.sort_unstable_by(|a, b| b.cmp(a));
            copy
        };
        assert_eq!(views.len(), 60);
        assert_eq!(views, sorted);
        views.dedup();
        assert_eq!(views.len(), 60);
    }

    #[tokio::test]
    async fn last_page_has_no_next() {
        let store = seeded_store(40).await;
        let service = RankingService::new(store);

        let Ok(last) = service.load_more(&VideoFilters::default(), 2, 30).await else {
            panic!("page 2 should succeed");
        };
        assert_eq!(last.page.videos.len(), 10);
        assert_eq!(last.next_page, None);
        assert!(!last.page.has_more);
    }

    #[tokio::test]
    async fn windowed_path_slices_in_memory() {
        let store = seeded_store(4).await;
        // Give every video a baseline snapshot yesterday so the chart
        // is fully populated; growth equals views - 100.
        let yesterday = snapshot_day(Utc::now()) - Duration::days(1);
        for i in 0..4 {
            store
                .seed_snapshot(DailySnapshot {
                    video_id: format!("v{i:03}"),
                    view_count: 100,
                    like_count: 0,
                    snapshot_date: yesterday,
                    created_at: Utc::now(),
                })
                .await;
        }
        let service = RankingService::new(store);

        let filters = VideoFilters {
            rank: RankKind::Daily,
            limit: 2,
            offset: 2,
            ..VideoFilters::default()
        };
        let Ok(page) = service.get_videos(&filters).await else {
            panic!("query should succeed");
        };
        assert_eq!(page.total_count, 4);
        assert_eq!(page.videos.len(), 2);
        assert!(!page.has_more);
        let ranks: Vec<i64> = page.videos.iter().map(|v| v.rank).collect();
        assert_eq!(ranks, vec![3, 4]);
        assert!(page.videos.iter().all(|v| v.view_growth.is_some()));
    }

    #[tokio::test]
    async fn search_applies_to_the_windowed_path() {
        let store = Arc::new(MemoryStore::new());
        let mut hit = new_video("v1", 500, PlaylistKind::Original);
        hit.title = "Neon ABC Live".to_string();
        let miss = new_video("v2", 900, PlaylistKind::Original);
        let Ok(_) = store.upsert_videos(&[hit, miss]).await else {
            panic!("seed should succeed");
        };
        let yesterday = snapshot_day(Utc::now()) - Duration::days(1);
        for id in ["v1", "v2"] {
            store
                .seed_snapshot(DailySnapshot {
                    video_id: id.to_string(),
                    view_count: 1,
                    like_count: 0,
                    snapshot_date: yesterday,
                    created_at: Utc::now(),
                })
                .await;
        }
        let service = RankingService::new(store);

        let filters = VideoFilters {
            rank: RankKind::Weekly,
            search: Some("abc".to_string()),
            ..VideoFilters::default()
        };
        let Ok(page) = service.get_videos(&filters).await else {
            panic!("query should succeed");
        };
        assert_eq!(page.total_count, 1);
        let Some(only) = page.videos.first() else {
            panic!("one row expected");
        };
        assert_eq!(only.video.video_id, "v1");
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() {
        let store = seeded_store(1).await;
        let service = RankingService::new(store);
        let filters = VideoFilters {
            limit: 0,
            ..VideoFilters::default()
        };
        assert!(matches!(
            service.get_videos(&filters).await,
            Err(RankerError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn page_zero_is_rejected() {
        let store = seeded_store(1).await;
        let service = RankingService::new(store);
        assert!(matches!(
            service.load_more(&VideoFilters::default(), 0, 30).await,
            Err(RankerError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn sort_by_date_orders_by_publication() {
        let store = Arc::new(MemoryStore::new());
        let mut old = new_video("old", 999, PlaylistKind::Original);
        let Some(early) = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single() else {
            panic!("valid instant");
        };
        old.published_at = early;
        let recent = new_video("new", 1, PlaylistKind::Original);
        let Ok(_) = store.upsert_videos(&[old, recent]).await else {
            panic!("seed should succeed");
        };
        let service = RankingService::new(store);

        let filters = VideoFilters {
            sort: SortKey::Date,
            ..VideoFilters::default()
        };
        let Ok(page) = service.get_videos(&filters).await else {
            panic!("query should succeed");
        };
        let ids: Vec<&str> = page.videos.iter().map(|v| v.video.video_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }
}
