use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::history::{Entry, ShellType};

/// Aggregate counts over a batch of history entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total: usize,
    pub unique: usize,
    /// Most frequent command and how many times it appears
    pub top_command: Option<(String, usize)>,
    pub per_shell: BTreeMap<ShellType, usize>,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

impl HistoryStats {
    /// Compute statistics for a batch of entries
    ///
    /// Entries without a timestamp count towards totals but not towards the
    /// oldest/newest range. When several commands share the highest count the
    /// lexicographically smallest one is reported, so the result does not
    /// depend on input order.
    pub fn summarize(entries: &[Entry]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut per_shell = BTreeMap::new();
        let mut oldest: Option<DateTime<Utc>> = None;
        let mut newest: Option<DateTime<Utc>> = None;

        for entry in entries {
            *counts.entry(entry.command()).or_insert(0) += 1;
            *per_shell.entry(entry.shell()).or_insert(0) += 1;

            if let Some(ts) = entry.timestamp() {
                oldest = Some(oldest.map_or(ts, |o| o.min(ts)));
                newest = Some(newest.map_or(ts, |n| n.max(ts)));
            }
        }

        let top_command = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(cmd, count)| (cmd.to_string(), *count));

        Self { total: entries.len(), unique: counts.len(), top_command, per_shell, oldest, newest }
    }

    /// Shell contributing the most entries (ties resolve to the first in enum order)
    pub fn busiest_shell(&self) -> Option<(ShellType, usize)> {
        self.per_shell
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(shell, count)| (*shell, *count))
    }

    /// Time between the oldest and newest timestamped entries
    pub fn time_span(&self) -> Option<Duration> {
        match (self.oldest, self.newest) {
            (Some(oldest), Some(newest)) => Some(newest - oldest),
            _ => None,
        }
    }
}
