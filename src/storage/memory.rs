use anyhow::Result;
use parking_lot::Mutex;

use super::HistoryStore;

/// In-memory store recording every command it receives, in arrival order
#[derive(Debug, Default)]
pub struct MemoryStore {
    commands: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().is_empty()
    }

    /// Snapshot of the stored commands
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }
}

impl HistoryStore for MemoryStore {
    fn add_history(&self, command: &str) -> Result<()> {
        self.commands.lock().push(command.to_string());
        Ok(())
    }
}
