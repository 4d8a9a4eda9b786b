//! Ingestion pipeline: fetch, join, map, persist, snapshot.

pub mod mapper;
pub mod pipeline;
pub mod snapshot;

pub use pipeline::{IngestionPipeline, IngestionReport};
pub use snapshot::{SnapshotDecision, SnapshotPolicy, SnapshotWriteMode};
