use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{Dispatch, dispatcher, info, warn};

use crate::filters::SensitiveFilter;
use crate::ingest::cache::HistoryCache;
use crate::ingest::importer::{ImportError, ImportReport, import_entries};
use crate::ingest::reader::{ReadError, ReadReport, read_sources};
use crate::ingest::shell_detection::{DetectedSources, EnvLookup, detect_shells_with_env};
use crate::models::Entry;
use crate::storage::HistoryStore;
use crate::utils::{CancelToken, default_worker_count, get_home_dir};

/// Settings for a [`HistoryEngine`]
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory history files are searched under
    pub home: PathBuf,
    /// Ceiling on concurrent parsers and size of the import pool
    pub workers: NonZeroUsize,
    pub sensitive: SensitiveFilter,
    /// Environment consulted for history file overrides
    pub env: EnvLookup,
}

impl EngineConfig {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            workers: default_worker_count(),
            sensitive: SensitiveFilter::default(),
            env: EnvLookup::Process,
        }
    }

    /// Configuration for the current user, honouring `HISTORY_INGEST_WORKERS`
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(get_home_dir()?))
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = home.into();
        self
    }

    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_sensitive_filter(mut self, filter: SensitiveFilter) -> Self {
        self.sensitive = filter;
        self
    }

    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }
}

/// Detects, reads and imports shell history
///
/// The engine owns its parse cache and its log dispatcher. Nothing is shared
/// through globals: two engines only share a cache when handed the same
/// [`HistoryCache`], and log output goes to the dispatcher given via
/// [`HistoryEngine::with_dispatch`] (silent by default), including output
/// from worker threads.
///
/// # Examples
///
/// ```no_run
/// use shell_history_ingest::{CancelToken, EngineConfig, HistoryEngine, MemoryStore};
///
/// let engine = HistoryEngine::new(EngineConfig::from_env()?);
/// let cancel = CancelToken::new();
/// let report = engine.read_all(&cancel)?;
/// let store = MemoryStore::new();
/// let imported = engine.import(&store, report.entries, &cancel)?;
/// println!("Imported {} commands", imported.stored());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct HistoryEngine {
    config: EngineConfig,
    cache: Arc<HistoryCache>,
    dispatch: Dispatch,
}

impl HistoryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, cache: Arc::new(HistoryCache::new()), dispatch: Dispatch::none() }
    }

    /// Use a cache shared with other engines
    pub fn with_cache(mut self, cache: Arc<HistoryCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Send this engine's logs to `dispatch`
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<HistoryCache> {
        &self.cache
    }

    /// Find the history files available under the configured home
    pub fn detect(&self) -> DetectedSources {
        self.in_scope(|| detect_shells_with_env(&self.config.home, &self.config.env))
    }

    /// Detect every history source and read them all concurrently
    ///
    /// # Errors
    ///
    /// [`ReadError::NoSources`] if no history file is found; see
    /// [`HistoryEngine::read_sources`] for the rest.
    pub fn read_all(&self, cancel: &CancelToken) -> Result<ReadReport, ReadError> {
        self.in_scope(|| {
            let sources = detect_shells_with_env(&self.config.home, &self.config.env);
            if sources.is_empty() {
                warn!(home = %self.config.home.display(), "no shell history files found");
                return Err(ReadError::NoSources);
            }
            info!(sources = sources.len(), "reading shell history");
            read_sources(&sources, &self.cache, self.config.workers, cancel)
        })
    }

    /// Read an explicit set of history sources concurrently
    ///
    /// Unreadable sources are logged and reported in
    /// [`ReadReport::failed_sources`]. Cancellation returns
    /// [`ReadError::Cancelled`] with every entry parsed before it fired.
    pub fn read_sources(
        &self,
        sources: &DetectedSources,
        cancel: &CancelToken,
    ) -> Result<ReadReport, ReadError> {
        self.in_scope(|| read_sources(sources, &self.cache, self.config.workers, cancel))
    }

    /// Deduplicate `entries`, drop sensitive ones and write the rest to `store`
    pub fn import<S>(
        &self,
        store: &S,
        entries: Vec<Entry>,
        cancel: &CancelToken,
    ) -> Result<ImportReport, ImportError>
    where
        S: HistoryStore + ?Sized,
    {
        self.in_scope(|| {
            let report =
                import_entries(store, entries, self.config.workers, &self.config.sensitive, cancel)?;
            info!(
                stored = report.stored(),
                skipped = report.skipped,
                failed = report.failed,
                "imported shell history"
            );
            Ok(report)
        })
    }

    fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }
}
