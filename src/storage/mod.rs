//! Storage collaborators the importer writes into
//!
//! The engine only needs [`HistoryStore::add_history`]. Implementations must be
//! safe to call from several import workers at once, so both stores here lock
//! internally.
//!
//! - [`MemoryStore`]: keeps commands in process, used for dry runs and tests
//! - [`JsonlStore`]: appends one JSON object per command to a file

pub mod jsonl;
pub mod memory;

use anyhow::Result;

pub use jsonl::{JsonlStore, StoredCommand};
pub use memory::MemoryStore;

/// Sink for imported commands
pub trait HistoryStore: Send + Sync {
    /// Persist one command
    ///
    /// Cancellation is checked by the import workers between calls, never
    /// during one. A store that needs a deadline enforces it itself.
    fn add_history(&self, command: &str) -> Result<()>;
}

