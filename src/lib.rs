//! # vidrank
//!
//! Ingestion and ranking service for curated YouTube video charts.
//!
//! Periodically pulls catalog metadata and engagement counters for a
//! small set of curated playlists, persists them with idempotent
//! upserts, captures once-per-day statistics snapshots, and serves
//! filtered, sorted, searched, and paginated chart views (total, daily,
//! weekly) over HTTP. Daily/weekly aggregation itself lives in stored
//! ranking functions; this service is a coordination layer.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler / Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── IngestionPipeline (ingest/)
//!     │       ├── PlaylistSource (source/)
//!     │       └── SnapshotPolicy (ingest/)
//!     ├── RankingService (service/)
//!     │
//!     └── VideoStore (persistence/)
//!             └── PostgreSQL (+ rank_daily / rank_weekly)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod persistence;
pub mod service;
pub mod source;
