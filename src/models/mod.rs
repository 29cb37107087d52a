//! Data models for shell history ingestion.
//!
//! - [`Entry`] - One parsed command with its timestamp and shell of origin
//! - [`ShellType`] - The shell dialect a history file belongs to
//! - [`HistoryStats`] - Aggregate counts computed from a batch of entries

pub mod history;
pub mod stats;

pub use history::{Entry, MIN_COMMAND_LEN, ShellType, is_long_enough};
pub use stats::HistoryStats;
