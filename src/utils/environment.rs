use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable overriding the default worker count
pub const WORKERS_ENV: &str = "HISTORY_INGEST_WORKERS";

/// Get the user's home directory
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Could not determine home directory")
}

/// Worker count from [`WORKERS_ENV`], falling back to the number of CPUs
///
/// Unparseable or zero values are ignored.
pub fn default_worker_count() -> NonZeroUsize {
    worker_count_from(env::var(WORKERS_ENV).ok().as_deref())
}

pub(crate) fn worker_count_from(value: Option<&str>) -> NonZeroUsize {
    value
        .and_then(|v| v.trim().parse::<NonZeroUsize>().ok())
        .or_else(|| std::thread::available_parallelism().ok())
        .unwrap_or(NonZeroUsize::MIN)
}
