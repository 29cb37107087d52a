use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::Entry;

/// Parsed entries per history file, kept for the lifetime of the cache
///
/// Lookups share a read lock; inserts take the write lock only for the map
/// update, never while a file is being parsed. Nothing is evicted, so a
/// changed file is only re-read by a fresh cache.
#[derive(Debug, Default)]
pub struct HistoryCache {
    entries: RwLock<HashMap<PathBuf, Arc<Vec<Entry>>>>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<Arc<Vec<Entry>>> {
        self.entries.read().get(path).cloned()
    }

    /// Store the entries parsed from `path`, replacing any previous result
    pub fn put(&self, path: PathBuf, entries: Vec<Entry>) -> Arc<Vec<Entry>> {
        let entries = Arc::new(entries);
        self.entries.write().insert(path, Arc::clone(&entries));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;
    use crate::models::ShellType;

    fn entries(commands: &[&str]) -> Vec<Entry> {
        commands.iter().filter_map(|c| Entry::new(c, None, ShellType::Bash, *c)).collect()
    }

    #[test]
    fn test_get_missing_path() {
        let cache = HistoryCache::new();
        assert!(cache.get(Path::new("/home/u/.bash_history")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_then_get_returns_shared_entries() {
        let cache = HistoryCache::new();
        let path = PathBuf::from("/home/u/.bash_history");
        let stored = cache.put(path.clone(), entries(&["git status", "make"]));

        let hit = cache.get(&path).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
        assert_eq!(hit.len(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_replaces_and_clear_empties() {
        let cache = HistoryCache::new();
        let path = PathBuf::from("/h/.zsh_history");
        cache.put(path.clone(), entries(&["echo one"]));
        cache.put(path.clone(), entries(&["echo one", "echo two"]));
        assert_eq!(cache.get(&path).unwrap().len(), 2);

        cache.clear();
        assert!(cache.get(&path).is_none());
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let cache = HistoryCache::new();
        let barrier = Barrier::new(8);

        thread::scope(|scope| {
            for i in 0..8 {
                let cache = &cache;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    let path = PathBuf::from(format!("/h/history-{}", i % 4));
                    if cache.get(&path).is_none() {
                        cache.put(path.clone(), entries(&["cargo check"]));
                    }
                    assert_eq!(cache.get(&path).unwrap().len(), 1);
                });
            }
        });

        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_separate_caches_do_not_share_state() {
        let first = HistoryCache::new();
        let second = HistoryCache::new();
        first.put(PathBuf::from("/h/.bash_history"), entries(&["ls -la"]));
        assert!(second.is_empty());
    }
}
