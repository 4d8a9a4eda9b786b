//! Service layer: chart queries over the store gateway.

pub mod ranking;

pub use ranking::{RankingService, VideoPageCursor};
