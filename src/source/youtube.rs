//! YouTube Data API v3 implementation of [`PlaylistSource`].

use async_trait::async_trait;

use super::types::{PlaylistItemsResponse, PlaylistPage, StatsEntry, VideoListResponse};
use super::{PAGE_SIZE, PlaylistSource};
use crate::error::RankerError;

/// Default API base, overridable for tests and proxies.
pub const DEFAULT_API_BASE: &str = "https://youtube.googleapis.com/youtube/v3";

/// [`PlaylistSource`] backed by the YouTube Data API v3.
///
/// Uses `playlistItems.list?part=snippet` for catalog pages and
/// `videos.list?part=statistics` for counters, authenticated by API
/// key. A single [`reqwest::Client`] is shared across all calls.
#[derive(Debug, Clone)]
pub struct YouTubeSource {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl YouTubeSource {
    /// Creates a source against [`DEFAULT_API_BASE`].
    #[must_use]
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self::with_base(http, api_key, DEFAULT_API_BASE.to_string())
    }

    /// Creates a source against a custom API base URL.
    #[must_use]
    pub fn with_base(http: reqwest::Client, api_key: String, api_base: String) -> Self {
        Self {
            http,
            api_base,
            api_key,
        }
    }

    fn fetch_error(context: &str, err: &reqwest::Error) -> RankerError {
        if let Some(status) = err.status() {
            RankerError::SourceFetch(format!("{context}: upstream returned {status}"))
        } else {
            RankerError::SourceFetch(format!("{context}: {err}"))
        }
    }
}

#[async_trait]
impl PlaylistSource for YouTubeSource {
    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, RankerError> {
        let url = format!("{}/playlistItems", self.api_base);
        let mut request = self.http.get(&url).query(&[
            ("part", "snippet"),
            ("maxResults", &PAGE_SIZE.to_string()),
            ("playlistId", playlist_id),
            ("key", &self.api_key),
        ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let context = format!("playlist {playlist_id}");
        let body: PlaylistItemsResponse = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Self::fetch_error(&context, &e))?
            .json()
            .await
            .map_err(|e| Self::fetch_error(&context, &e))?;

        Ok(PlaylistPage {
            entries: body.items.into_iter().map(Into::into).collect(),
            next_page_token: body.next_page_token,
        })
    }

    async fn video_statistics(&self, ids: &[String]) -> Result<Vec<StatsEntry>, RankerError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() > PAGE_SIZE {
            return Err(RankerError::SourceFetch(format!(
                "statistics id list exceeds the {PAGE_SIZE}-id bound: {}",
                ids.len()
            )));
        }

        let url = format!("{}/videos", self.api_base);
        let body: VideoListResponse = self
            .http
            .get(&url)
            .query(&[
                ("part", "statistics"),
                ("id", &ids.join(",")),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Self::fetch_error("video statistics", &e))?
            .json()
            .await
            .map_err(|e| Self::fetch_error("video statistics", &e))?;

        Ok(body.items.into_iter().map(Into::into).collect())
    }
}
