//! Shell history ingestion pipeline
//!
//! Detection → concurrent read (with a per-path cache) → deduplication →
//! concurrent import into a [`HistoryStore`](crate::storage::HistoryStore).
//!
//! # Error Handling Strategy
//!
//! Partial success is preferred over failing the whole run:
//!
//! - **Missing shells** are not errors. Detection simply leaves them out.
//! - **Source-level failures** (unreadable or oversized files, I/O errors)
//!   are logged, listed in [`ReadReport::failed_sources`] and contribute no
//!   entries. Other sources are unaffected.
//! - **Write failures** are counted in [`ImportReport::failed`] and logged
//!   once per batch.
//! - **Hard failures** are limited to finding no history at all
//!   ([`ReadError::NoSources`]) and importing an empty batch
//!   ([`ImportError::EmptyBatch`]).
//! - **Cancellation** surfaces as an error that still carries the partial
//!   results.

pub mod cache;
pub mod dedupe;
pub mod engine;
pub mod importer;
pub mod reader;
pub mod shell_detection;

pub use cache::HistoryCache;
pub use dedupe::{dedupe, sort_newest_first};
pub use engine::{EngineConfig, HistoryEngine};
pub use importer::{ImportError, ImportReport, import_entries};
pub use reader::{FailedSource, ReadError, ReadReport, read_sources};
pub use shell_detection::{DetectedSources, EnvLookup, detect_shells, detect_shells_with_env};
