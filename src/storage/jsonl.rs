use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::HistoryStore;

/// One line of a [`JsonlStore`] file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCommand {
    pub command: String,
    pub imported_at: DateTime<Utc>,
}

/// Append-only JSON Lines file of imported commands
///
/// Writes are buffered; call [`JsonlStore::flush`] once the import finishes.
/// The buffer is also flushed on drop, but errors are lost there.
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonlStore {
    /// Open (or create) the store file, creating parent directories if missing
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open store file: {}", path.display()))?;

        Ok(Self { path: path.to_path_buf(), writer: Mutex::new(BufWriter::new(file)) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .with_context(|| format!("Failed to flush store file: {}", self.path.display()))
    }

    /// Read every record back from a store file
    pub fn load(path: &Path) -> Result<Vec<StoredCommand>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read store file: {}", path.display()))?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(i, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("Invalid record on line {} of {}", i + 1, path.display()))
            })
            .collect()
    }
}

impl HistoryStore for JsonlStore {
    fn add_history(&self, command: &str) -> Result<()> {
        let record = StoredCommand { command: command.to_string(), imported_at: Utc::now() };
        let line = serde_json::to_string(&record).context("Failed to serialize command")?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)
            .with_context(|| format!("Failed to write to store file: {}", self.path.display()))
    }
}
