//! Playlist registry types.
//!
//! Every ingested video is tagged with the playlist it was drawn from
//! and that playlist's classification. The registry is injected
//! configuration, not a process-wide constant, so tests can substitute
//! fixtures.

use serde::{Deserialize, Serialize};

use crate::error::RankerError;

/// Classification of a curated playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    /// First-party uploads.
    Original,
    /// Cover performances.
    Cover,
}

impl PlaylistKind {
    /// Returns the lowercase string stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Cover => "cover",
        }
    }
}

impl std::str::FromStr for PlaylistKind {
    type Err = RankerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(Self::Original),
            "cover" => Ok(Self::Cover),
            other => Err(RankerError::InvalidRequest(format!(
                "unknown playlist kind: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for PlaylistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single curated playlist: source identity plus classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistConfig {
    /// Source-assigned playlist identifier.
    pub id: String,
    /// Classification applied to every video drawn from this playlist.
    pub kind: PlaylistKind,
}

impl PlaylistConfig {
    /// Parses a `"<playlist-id>:<kind>"` spec as used in the
    /// `PLAYLISTS` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::InvalidRequest`] when the spec has no `:`
    /// separator or an unknown kind.
    pub fn from_spec(spec: &str) -> Result<Self, RankerError> {
        let (id, kind) = spec.split_once(':').ok_or_else(|| {
            RankerError::InvalidRequest(format!("playlist spec missing ':' separator: {spec}"))
        })?;
        if id.is_empty() {
            return Err(RankerError::InvalidRequest(
                "playlist spec has empty id".to_string(),
            ));
        }
        Ok(Self {
            id: id.to_string(),
            kind: kind.trim().parse()?,
        })
    }
}
