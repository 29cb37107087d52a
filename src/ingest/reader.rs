use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;

use rayon::ThreadPoolBuilder;
use thiserror::Error;
use tracing::{debug, dispatcher, warn};

use crate::ingest::cache::HistoryCache;
use crate::ingest::shell_detection::DetectedSources;
use crate::models::{Entry, ShellType};
use crate::parsers::{ParseError, parse_file};
use crate::utils::CancelToken;

/// A history source that contributed no entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedSource {
    pub shell: ShellType,
    pub path: PathBuf,
    pub reason: String,
}

/// Entries merged from every readable source
#[derive(Debug, Default)]
pub struct ReadReport {
    /// All entries, in no particular order across sources
    pub entries: Vec<Entry>,
    pub sources_read: usize,
    pub failed_sources: Vec<FailedSource>,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("no shell history files found")]
    NoSources,
    #[error("reading cancelled with {} entries collected", .partial.len())]
    Cancelled { partial: Vec<Entry> },
    #[error("failed to start history reader threads: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Result published by one source's reader task
struct SourceBatch {
    shell: ShellType,
    path: PathBuf,
    outcome: Result<Arc<Vec<Entry>>, ParseError>,
}

/// Read every source concurrently and merge the results
///
/// At most `workers` files are parsed at once. Each task checks `cache`
/// first and stores what it parsed there. A source that fails is logged and
/// listed in [`ReadReport::failed_sources`] without affecting the others.
///
/// # Errors
///
/// - [`ReadError::NoSources`] if `sources` is empty
/// - [`ReadError::Cancelled`] if `cancel` interrupted any parser; the partial
///   entries from every source are returned with it
pub fn read_sources(
    sources: &DetectedSources,
    cache: &HistoryCache,
    workers: NonZeroUsize,
    cancel: &CancelToken,
) -> Result<ReadReport, ReadError> {
    read_sources_with(sources, cache, workers, cancel, parse_file)
}

/// [`read_sources`] with the per-file parse step supplied by the caller
pub(crate) fn read_sources_with<F>(
    sources: &DetectedSources,
    cache: &HistoryCache,
    workers: NonZeroUsize,
    cancel: &CancelToken,
    load: F,
) -> Result<ReadReport, ReadError>
where
    F: Fn(ShellType, &Path, &CancelToken) -> Result<Vec<Entry>, ParseError> + Sync,
{
    if sources.is_empty() {
        return Err(ReadError::NoSources);
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.get().min(sources.len()))
        .thread_name(|i| format!("history-reader-{}", i))
        .build()?;

    // One slot per source, so publishing never blocks
    let (tx, rx) = mpsc::sync_channel::<SourceBatch>(sources.len());
    let dispatch = dispatcher::get_default(|current| current.clone());

    // The scope returns only after every task has published
    pool.scope(|scope| {
        for (shell, path) in sources {
            let tx = tx.clone();
            let dispatch = &dispatch;
            let load = &load;
            scope.spawn(move |_| {
                dispatcher::with_default(dispatch, || {
                    let outcome = load_source(*shell, path, cache, cancel, load);
                    let _ = tx.send(SourceBatch { shell: *shell, path: path.clone(), outcome });
                });
            });
        }
    });
    drop(tx);

    let mut report = ReadReport::default();
    let mut cancelled = false;

    for batch in rx {
        match batch.outcome {
            Ok(entries) => {
                report.sources_read += 1;
                report.entries.extend(entries.iter().cloned());
            }
            Err(ParseError::Cancelled { partial }) => {
                cancelled = true;
                report.entries.extend(partial);
            }
            Err(e) => {
                warn!(
                    shell = %batch.shell,
                    path = %batch.path.display(),
                    error = %e,
                    "skipping unreadable history source"
                );
                report.failed_sources.push(FailedSource {
                    shell: batch.shell,
                    path: batch.path,
                    reason: e.to_string(),
                });
            }
        }
    }

    if cancelled {
        return Err(ReadError::Cancelled { partial: report.entries });
    }

    debug!(
        entries = report.entries.len(),
        sources = report.sources_read,
        failed = report.failed_sources.len(),
        "finished reading history"
    );

    Ok(report)
}

/// Cached entries for `path`, parsing the file on a miss
fn load_source<F>(
    shell: ShellType,
    path: &Path,
    cache: &HistoryCache,
    cancel: &CancelToken,
    load: &F,
) -> Result<Arc<Vec<Entry>>, ParseError>
where
    F: Fn(ShellType, &Path, &CancelToken) -> Result<Vec<Entry>, ParseError>,
{
    if let Some(entries) = cache.get(path) {
        debug!(%shell, path = %path.display(), "history cache hit");
        return Ok(entries);
    }

    let entries = load(shell, path, cancel)?;
    debug!(%shell, path = %path.display(), entries = entries.len(), "parsed history file");
    Ok(cache.put(path.to_path_buf(), entries))
}
