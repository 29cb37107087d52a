use std::io;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, dispatcher, warn};

use crate::filters::SensitiveFilter;
use crate::ingest::dedupe::dedupe;
use crate::models::{Entry, is_long_enough};
use crate::storage::HistoryStore;
use crate::utils::CancelToken;

/// Queued jobs per worker before the feeder blocks
const JOBS_PER_WORKER: usize = 16;

/// Outcome counts for one import batch
///
/// `succeeded` includes `skipped`: entries filtered out as too short or
/// sensitive count as handled, not as failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportReport {
    /// Entries actually written to the store
    pub fn stored(&self) -> usize {
        self.succeeded - self.skipped
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("nothing to import: the entry batch is empty")]
    EmptyBatch,
    #[error("import cancelled after {} entries", .report.processed())]
    Cancelled { report: ImportReport },
    #[error("failed to start import worker: {0}")]
    Spawn(#[source] io::Error),
}

enum Outcome {
    Stored,
    Skipped,
    Failed,
}

/// Write `entries` into `store` using a pool of `workers` threads
///
/// The batch is deduplicated first. Entries shorter than two characters or
/// matching `filter` are skipped without touching the store. A failed write is
/// counted and the batch carries on.
///
/// # Errors
///
/// - [`ImportError::EmptyBatch`] if `entries` is empty
/// - [`ImportError::Cancelled`] if `cancel` fired before every entry was
///   handled; the report covers the entries processed until then
/// - [`ImportError::Spawn`] if a worker thread cannot be started
pub fn import_entries<S>(
    store: &S,
    entries: Vec<Entry>,
    workers: NonZeroUsize,
    filter: &SensitiveFilter,
    cancel: &CancelToken,
) -> Result<ImportReport, ImportError>
where
    S: HistoryStore + ?Sized,
{
    if entries.is_empty() {
        return Err(ImportError::EmptyBatch);
    }

    let entries = dedupe(entries);
    let total = entries.len();
    let workers = workers.get().min(total);

    let (result_tx, result_rx) = mpsc::channel::<Outcome>();
    let dispatch = dispatcher::get_default(|current| current.clone());

    thread::scope(|scope| -> Result<(), ImportError> {
        let (job_tx, job_rx) = mpsc::sync_channel::<Entry>(workers * JOBS_PER_WORKER);
        let job_rx = Arc::new(Mutex::new(job_rx));

        for id in 0..workers {
            let jobs = Arc::clone(&job_rx);
            let results = result_tx.clone();
            let dispatch = &dispatch;
            thread::Builder::new()
                .name(format!("history-import-{}", id))
                .spawn_scoped(scope, move || {
                    dispatcher::with_default(dispatch, || {
                        run_worker(&jobs, &results, store, filter, cancel)
                    })
                })
                .map_err(ImportError::Spawn)?;
        }
        // Workers hold the only receivers now, so a send fails once they all stop
        drop(job_rx);

        for entry in entries {
            if cancel.is_cancelled() || job_tx.send(entry).is_err() {
                break;
            }
        }
        // Dropping the sender lets idle workers exit
        Ok(())
    })?;
    drop(result_tx);

    let mut report = ImportReport::default();
    for outcome in result_rx {
        match outcome {
            Outcome::Stored => report.succeeded += 1,
            Outcome::Skipped => {
                report.succeeded += 1;
                report.skipped += 1;
            }
            Outcome::Failed => report.failed += 1,
        }
    }

    if report.failed > 0 {
        warn!(failed = report.failed, total, "some history entries could not be stored");
    }

    if report.processed() < total && cancel.is_cancelled() {
        return Err(ImportError::Cancelled { report });
    }

    debug!(
        stored = report.stored(),
        skipped = report.skipped,
        failed = report.failed,
        "import finished"
    );

    Ok(report)
}

fn run_worker<S>(
    jobs: &Mutex<Receiver<Entry>>,
    results: &Sender<Outcome>,
    store: &S,
    filter: &SensitiveFilter,
    cancel: &CancelToken,
) where
    S: HistoryStore + ?Sized,
{
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let Ok(entry) = jobs.lock().recv() else { break };

        let command = entry.command();
        let outcome = if !is_long_enough(command) || filter.is_sensitive(command) {
            Outcome::Skipped
        } else {
            match store.add_history(command) {
                Ok(()) => Outcome::Stored,
                Err(e) => {
                    debug!(error = %format!("{:#}", e), "failed to store history entry");
                    Outcome::Failed
                }
            }
        };

        if results.send(outcome).is_err() {
            break;
        }
    }
}
