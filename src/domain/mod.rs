//! Domain model: playlist registry, video records, snapshots, and
//! query filters.

pub mod filters;
pub mod playlist;
pub mod video;

pub use filters::{
    DEFAULT_LIMIT, PlaylistFilter, RankKind, RankWindow, SortKey, VideoFilters, VideoPage,
};
pub use playlist::{PlaylistConfig, PlaylistKind};
pub use video::{DailySnapshot, NewVideo, RankedVideo, VideoRecord};
