//! PostgreSQL implementation of the store gateway.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::VideoStore;
use super::models::{RankedVideoRow, VideoRow};
use crate::domain::{
    NewVideo, PlaylistKind, RankWindow, RankedVideo, VideoFilters, VideoRecord,
};
use crate::error::RankerError;

/// Upsert batch size; keeps each statement well under the bind limit.
const UPSERT_CHUNK: usize = 500;

const VIDEO_COLUMNS: &str = "video_id, title, description, channel_id, channel_title, \
     published_at, view_count, like_count, thumbnail_url, owner_channel_title, \
     playlist_id, playlist_type, \"position\", created_at, updated_at";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_chart_filters(
        builder: &mut QueryBuilder<'_, Postgres>,
        kind: Option<PlaylistKind>,
        search: Option<&str>,
    ) {
        let mut prefix = " WHERE ";
        if let Some(kind) = kind {
            builder.push(prefix).push("playlist_type = ");
            builder.push_bind(kind.as_str());
            prefix = " AND ";
        }
        if let Some(needle) = search {
            let pattern = format!("%{}%", escape_like(needle));
            builder.push(prefix).push("(title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR owner_channel_title ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }
}

/// Escapes the `LIKE` wildcard characters in a user-supplied search
/// term so it is matched literally.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl VideoStore for PostgresStore {
    async fn upsert_videos(&self, videos: &[NewVideo]) -> Result<u64, RankerError> {
        let mut written = 0u64;
        for chunk in videos.chunks(UPSERT_CHUNK) {
            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
                "INSERT INTO videos (video_id, title, description, channel_id, \
                 channel_title, published_at, view_count, like_count, thumbnail_url, \
                 owner_channel_title, playlist_id, playlist_type, \"position\") ",
            );
            builder.push_values(chunk, |mut row, video| {
                row.push_bind(&video.video_id)
                    .push_bind(&video.title)
                    .push_bind(&video.description)
                    .push_bind(&video.channel_id)
                    .push_bind(&video.channel_title)
                    .push_bind(video.published_at)
                    .push_bind(video.view_count)
                    .push_bind(video.like_count)
                    .push_bind(&video.thumbnail_url)
                    .push_bind(&video.owner_channel_title)
                    .push_bind(&video.playlist_id)
                    .push_bind(video.playlist_kind.as_str())
                    .push_bind(video.position);
            });
            // created_at stays untouched on conflict: the first
            // observation wins for that column only.
            builder.push(
                " ON CONFLICT (video_id) DO UPDATE SET \
                 title = EXCLUDED.title, \
                 description = EXCLUDED.description, \
                 channel_id = EXCLUDED.channel_id, \
                 channel_title = EXCLUDED.channel_title, \
                 published_at = EXCLUDED.published_at, \
                 view_count = EXCLUDED.view_count, \
                 like_count = EXCLUDED.like_count, \
                 thumbnail_url = EXCLUDED.thumbnail_url, \
                 owner_channel_title = EXCLUDED.owner_channel_title, \
                 playlist_id = EXCLUDED.playlist_id, \
                 playlist_type = EXCLUDED.playlist_type, \
                 \"position\" = EXCLUDED.\"position\", \
                 updated_at = now()",
            );

            let result = builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| RankerError::PersistenceError(e.to_string()))?;
            written += result.rows_affected();
        }
        Ok(written)
    }

    async fn has_snapshots_for(&self, day: NaiveDate) -> Result<bool, RankerError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM video_daily_stats WHERE snapshot_date = $1)",
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RankerError::PersistenceError(e.to_string()))
    }

    async fn upsert_snapshots(
        &self,
        day: NaiveDate,
        videos: &[NewVideo],
        overwrite: bool,
    ) -> Result<u64, RankerError> {
        let mut written = 0u64;
        for chunk in videos.chunks(UPSERT_CHUNK) {
            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
                "INSERT INTO video_daily_stats (video_id, view_count, like_count, snapshot_date) ",
            );
            builder.push_values(chunk, |mut row, video| {
                row.push_bind(&video.video_id)
                    .push_bind(video.view_count)
                    .push_bind(video.like_count)
                    .push_bind(day);
            });
            // The unique constraint on (video_id, snapshot_date) is
            // what actually enforces at-most-once per day: a run that
            // loses the first-writer race simply affects zero rows.
            if overwrite {
                builder.push(
                    " ON CONFLICT (video_id, snapshot_date) DO UPDATE SET \
                     view_count = EXCLUDED.view_count, \
                     like_count = EXCLUDED.like_count",
                );
            } else {
                builder.push(" ON CONFLICT (video_id, snapshot_date) DO NOTHING");
            }

            let result = builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| RankerError::PersistenceError(e.to_string()))?;
            written += result.rows_affected();
        }
        Ok(written)
    }

    async fn query_videos(
        &self,
        filters: &VideoFilters,
    ) -> Result<(Vec<VideoRecord>, u64), RankerError> {
        let kind = filters.playlist.kind();
        let search = filters.search.as_deref();

        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM videos");
        Self::push_chart_filters(&mut count_builder, kind, search);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RankerError::PersistenceError(e.to_string()))?;

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {VIDEO_COLUMNS} FROM videos"));
        Self::push_chart_filters(&mut builder, kind, search);
        // Sort column comes from the SortKey enum, never from input.
        builder.push(format!(
            " ORDER BY {} DESC, video_id ASC",
            filters.sort.column()
        ));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(filters.limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::from(filters.offset));

        let rows: Vec<VideoRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RankerError::PersistenceError(e.to_string()))?;

        let videos = rows
            .into_iter()
            .map(VideoRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((videos, total.max(0) as u64))
    }

    async fn ranked_videos(
        &self,
        window: RankWindow,
        kind: Option<PlaylistKind>,
    ) -> Result<Vec<RankedVideo>, RankerError> {
        let sql = match window {
            RankWindow::Daily => "SELECT * FROM rank_daily($1)",
            RankWindow::Weekly => "SELECT * FROM rank_weekly($1)",
        };
        let rows: Vec<RankedVideoRow> = sqlx::query_as(sql)
            .bind(kind.map(|k| k.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RankerError::PersistenceError(e.to_string()))?;

        rows.into_iter().map(RankedVideo::try_from).collect()
    }
}
