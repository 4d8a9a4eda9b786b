//! Orchestrates one ingestion run: concurrent per-playlist fetch,
//! catalog/statistics join, idempotent persistence, and the gated
//! daily snapshot write.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures_util::future;

use super::mapper::map_video;
use super::snapshot::{SnapshotDecision, SnapshotPolicy, snapshot_day};
use crate::domain::{NewVideo, PlaylistConfig};
use crate::error::RankerError;
use crate::persistence::VideoStore;
use crate::source::PlaylistSource;
use crate::source::types::CatalogEntry;

/// Summary of one completed ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    /// Number of videos mapped and upserted.
    pub video_count: usize,
    /// Number of snapshot rows actually written (zero when the day was
    /// already captured).
    pub snapshot_count: u64,
    /// Calendar day the snapshot write targeted.
    pub snapshot_day: NaiveDate,
}

/// One-shot ingestion orchestrator.
///
/// Fetch sequences for different playlists run concurrently; pages
/// within one playlist are strictly sequential because each page's
/// cursor comes from the previous one. After fetch completes, the
/// video upsert and the policy-gated snapshot write run concurrently;
/// either failure fails the run with no rollback of the sibling write.
pub struct IngestionPipeline {
    source: Arc<dyn PlaylistSource>,
    store: Arc<dyn VideoStore>,
    playlists: Vec<PlaylistConfig>,
    policy: SnapshotPolicy,
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("playlists", &self.playlists)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl IngestionPipeline {
    /// Creates a pipeline over the given source, store, playlist
    /// registry, and snapshot policy.
    #[must_use]
    pub fn new(
        source: Arc<dyn PlaylistSource>,
        store: Arc<dyn VideoStore>,
        playlists: Vec<PlaylistConfig>,
        policy: SnapshotPolicy,
    ) -> Self {
        Self {
            source,
            store,
            playlists,
            policy,
        }
    }

    /// Runs one full ingestion pass.
    ///
    /// # Errors
    ///
    /// Fails fast on the first fetch, join-integrity, mapping, or
    /// write error; nothing is retried internally. A mid-run failure
    /// can leave earlier writes in place.
    pub async fn run(&self) -> Result<IngestionReport, RankerError> {
        let fetches = self
            .playlists
            .iter()
            .map(|playlist| self.collect_playlist(playlist));
        let per_playlist = future::try_join_all(fetches).await?;
        let videos: Vec<NewVideo> = per_playlist.into_iter().flatten().collect();

        let day = snapshot_day(Utc::now());
        let decision = self.policy.decide(self.store.as_ref(), day).await?;

        let (_, snapshot_count) = tokio::try_join!(
            self.store.upsert_videos(&videos),
            self.write_snapshots(decision, day, &videos),
        )?;

        tracing::info!(
            video_count = videos.len(),
            snapshot_count,
            day = %day,
            "ingestion run complete"
        );
        Ok(IngestionReport {
            video_count: videos.len(),
            snapshot_count,
            snapshot_day: day,
        })
    }

    /// Walks one playlist's cursor chain and maps every entry.
    async fn collect_playlist(
        &self,
        playlist: &PlaylistConfig,
    ) -> Result<Vec<NewVideo>, RankerError> {
        let mut videos = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .source
                .playlist_page(&playlist.id, page_token.as_deref())
                .await?;

            let ids: Vec<String> = page
                .entries
                .iter()
                .map(|entry| entry.video_id.clone())
                .collect();
            // One catalog page never exceeds the statistics id bound,
            // so this is a single call per page.
            let stats = self.source.video_statistics(&ids).await?;

            let mut catalog: HashMap<String, CatalogEntry> = page
                .entries
                .into_iter()
                .map(|entry| (entry.video_id.clone(), entry))
                .collect();

            for stat in &stats {
                let entry = catalog.remove(&stat.video_id).ok_or_else(|| {
                    RankerError::JoinIntegrity {
                        video_id: stat.video_id.clone(),
                    }
                })?;
                videos.push(map_video(entry, stat, playlist.kind, &playlist.id)?);
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(
            playlist = %playlist.id,
            kind = %playlist.kind,
            count = videos.len(),
            "playlist collected"
        );
        Ok(videos)
    }

    async fn write_snapshots(
        &self,
        decision: SnapshotDecision,
        day: NaiveDate,
        videos: &[NewVideo],
    ) -> Result<u64, RankerError> {
        match decision {
            SnapshotDecision::Skip => {
                tracing::info!(day = %day, "snapshots already captured; skipping");
                Ok(0)
            }
            SnapshotDecision::Write { overwrite } => {
                self.store.upsert_snapshots(day, videos, overwrite).await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unreachable)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;

    use crate::domain::PlaylistKind;
    use crate::ingest::snapshot::SnapshotWriteMode;
    use crate::persistence::memory::MemoryStore;
    use crate::source::types::{PlaylistPage, StatsEntry};

    /// Scripted source: playlists as named page sequences, statistics
    /// synthesized from the catalog unless overridden.
    struct ScriptedSource {
        pages: HashMap<String, Vec<PlaylistPage>>,
        orphan_stats: Option<String>,
    }

    impl ScriptedSource {
        fn new(pages: HashMap<String, Vec<PlaylistPage>>) -> Self {
            Self {
                pages,
                orphan_stats: None,
            }
        }

        fn with_orphan(mut self, video_id: &str) -> Self {
            self.orphan_stats = Some(video_id.to_string());
            self
        }
    }

    fn entry(video_id: &str) -> CatalogEntry {
        let Some(published) = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single() else {
            unreachable!()
        };
        CatalogEntry {
            video_id: video_id.to_string(),
            title: format!("Song {video_id}"),
            description: String::new(),
            channel_id: "UC1".to_string(),
            channel_title: "Curator".to_string(),
            published_at: published,
            thumbnail_url: String::new(),
            owner_channel_title: "Artist".to_string(),
            position: 0,
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> PlaylistPage {
        PlaylistPage {
            entries: ids.iter().map(|id| entry(id)).collect(),
            next_page_token: next.map(str::to_string),
        }
    }

    #[async_trait]
    impl PlaylistSource for ScriptedSource {
        async fn playlist_page(
            &self,
            playlist_id: &str,
            page_token: Option<&str>,
        ) -> Result<PlaylistPage, RankerError> {
            let pages = self.pages.get(playlist_id).ok_or_else(|| {
                RankerError::SourceFetch(format!("unknown playlist {playlist_id}"))
            })?;
            let index = match page_token {
                None => 0,
                Some(token) => token.parse::<usize>().map_err(|_| {
                    RankerError::SourceFetch(format!("bad page token {token}"))
                })?,
            };
            pages.get(index).cloned().ok_or_else(|| {
                RankerError::SourceFetch(format!("page {index} out of range"))
            })
        }

        async fn video_statistics(
            &self,
            ids: &[String],
        ) -> Result<Vec<StatsEntry>, RankerError> {
            let mut stats: Vec<StatsEntry> = ids
                .iter()
                .map(|id| StatsEntry {
                    video_id: id.clone(),
                    view_count: Some("1000".to_string()),
                    like_count: None,
                })
                .collect();
            if let Some(orphan) = &self.orphan_stats {
                stats.push(StatsEntry {
                    video_id: orphan.clone(),
                    view_count: Some("1".to_string()),
                    like_count: None,
                });
            }
            Ok(stats)
        }
    }

    fn registry() -> Vec<PlaylistConfig> {
        vec![
            PlaylistConfig {
                id: "PL-A".to_string(),
                kind: PlaylistKind::Original,
            },
            PlaylistConfig {
                id: "PL-B".to_string(),
                kind: PlaylistKind::Cover,
            },
        ]
    }

    fn two_playlist_pages() -> HashMap<String, Vec<PlaylistPage>> {
        HashMap::from([
            // Playlist A: one page of two entries.
            ("PL-A".to_string(), vec![page(&["a1", "a2"], None)]),
            // Playlist B: two pages totalling two entries.
            (
                "PL-B".to_string(),
                vec![page(&["b1"], Some("1")), page(&["b2"], None)],
            ),
        ])
    }

    fn pipeline(source: ScriptedSource, store: Arc<MemoryStore>) -> IngestionPipeline {
        IngestionPipeline::new(
            Arc::new(source),
            store,
            registry(),
            SnapshotPolicy::new(SnapshotWriteMode::FirstWriterWins),
        )
    }

    #[tokio::test]
    async fn ingests_all_playlists_with_tags() {
        let store = Arc::new(MemoryStore::new());
        let run = pipeline(ScriptedSource::new(two_playlist_pages()), Arc::clone(&store));

        let Ok(report) = run.run().await else {
            panic!("run should succeed");
        };
        assert_eq!(report.video_count, 4);
        assert_eq!(report.snapshot_count, 4);

        let Some(a1) = store.video("a1").await else {
            panic!("a1 should be stored");
        };
        assert_eq!(a1.playlist_id, "PL-A");
        assert_eq!(a1.playlist_kind, PlaylistKind::Original);

        let Some(b2) = store.video("b2").await else {
            panic!("b2 should be stored");
        };
        assert_eq!(b2.playlist_id, "PL-B");
        assert_eq!(b2.playlist_kind, PlaylistKind::Cover);
    }

    #[tokio::test]
    async fn orphan_statistics_abort_the_run() {
        let store = Arc::new(MemoryStore::new());
        let source = ScriptedSource::new(two_playlist_pages()).with_orphan("ghost");
        let run = pipeline(source, Arc::clone(&store));

        let result = run.run().await;
        assert!(matches!(
            result,
            Err(RankerError::JoinIntegrity { video_id }) if video_id == "ghost"
        ));
        // Fail-fast before any persistence: the store saw no writes.
        assert_eq!(store.snapshot_count().await, 0);
    }

    #[tokio::test]
    async fn second_run_same_day_writes_no_snapshots() {
        let store = Arc::new(MemoryStore::new());
        let first = pipeline(ScriptedSource::new(two_playlist_pages()), Arc::clone(&store));
        let Ok(_) = first.run().await else {
            panic!("first run should succeed");
        };

        let second = pipeline(ScriptedSource::new(two_playlist_pages()), Arc::clone(&store));
        let Ok(report) = second.run().await else {
            panic!("second run should succeed");
        };
        assert_eq!(report.video_count, 4);
        assert_eq!(report.snapshot_count, 0);
        assert_eq!(store.snapshot_count().await, 4);
    }

    #[tokio::test]
    async fn overwrite_mode_rewrites_the_day() {
        let store = Arc::new(MemoryStore::new());
        let first = IngestionPipeline::new(
            Arc::new(ScriptedSource::new(two_playlist_pages())),
            Arc::clone(&store) as Arc<dyn VideoStore>,
            registry(),
            SnapshotPolicy::new(SnapshotWriteMode::Overwrite),
        );
        let Ok(_) = first.run().await else {
            panic!("first run should succeed");
        };

        let second = IngestionPipeline::new(
            Arc::new(ScriptedSource::new(two_playlist_pages())),
            Arc::clone(&store) as Arc<dyn VideoStore>,
            registry(),
            SnapshotPolicy::new(SnapshotWriteMode::Overwrite),
        );
        let Ok(report) = second.run().await else {
            panic!("second run should succeed");
        };
        assert_eq!(report.snapshot_count, 4);
    }

    #[tokio::test]
    async fn fetch_failure_aborts() {
        let store = Arc::new(MemoryStore::new());
        // Playlist B's second page is missing from the script.
        let pages = HashMap::from([
            ("PL-A".to_string(), vec![page(&["a1"], None)]),
            ("PL-B".to_string(), vec![page(&["b1"], Some("7"))]),
        ]);
        let run = pipeline(ScriptedSource::new(pages), Arc::clone(&store));

        assert!(matches!(run.run().await, Err(RankerError::SourceFetch(_))));
    }
}
