//! Shell History Ingest - Collect command history from every shell on a machine
//!
//! This library finds the history files of the shells a user has used, parses
//! each dialect into a common [`Entry`] shape and imports the result into a
//! [`HistoryStore`]. It supports:
//!
//! - Detecting bash, zsh, fish and PowerShell history files, honouring the
//!   usual environment overrides
//! - Parsing every dialect concurrently, with a per-path cache
//! - Deduplicating commands across shells, keeping the newest occurrence
//! - Skipping commands that look like they carry credentials
//! - Importing through a bounded worker pool with per-batch counts
//!
//! # Example
//!
//! ```no_run
//! use shell_history_ingest::{CancelToken, EngineConfig, HistoryEngine, HistoryStats};
//!
//! let engine = HistoryEngine::new(EngineConfig::from_env()?);
//! let report = engine.read_all(&CancelToken::new())?;
//! let stats = HistoryStats::summarize(&report.entries);
//! println!("Read {} commands from {} shells", stats.total, report.sources_read);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod filters;
pub mod ingest;
pub mod models;
pub mod parsers;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use filters::{SensitiveFilter, is_sensitive};
pub use ingest::{
    DetectedSources, EngineConfig, EnvLookup, HistoryCache, HistoryEngine, ImportError,
    ImportReport, ReadError, ReadReport, dedupe,
};
pub use models::{Entry, HistoryStats, ShellType};
pub use parsers::{DialectParser, ParseError, parse_file, parser_for};
pub use storage::{HistoryStore, JsonlStore, MemoryStore};
pub use utils::{CancelToken, format_path_with_tilde};
