use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;

use crate::models::Entry;

/// Collapse entries to one per distinct command, keeping the most recent
///
/// A later entry replaces the retained one only if its timestamp is strictly
/// newer; an untimestamped entry is older than any timestamped one. On a tie
/// the first entry seen wins. The output order is unspecified; use
/// [`sort_newest_first`] when a stable order matters.
pub fn dedupe(entries: Vec<Entry>) -> Vec<Entry> {
    let mut latest: HashMap<String, Entry> = HashMap::with_capacity(entries.len());

    for entry in entries {
        match latest.entry(entry.command().to_string()) {
            MapEntry::Occupied(mut slot) => {
                if entry.timestamp() > slot.get().timestamp() {
                    slot.insert(entry);
                }
            }
            MapEntry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }

    latest.into_values().collect()
}

/// Sort newest first; untimestamped entries go last, ties ordered by command
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        b.timestamp().cmp(&a.timestamp()).then_with(|| a.command().cmp(b.command()))
    });
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::models::ShellType;

    fn entry(cmd: &str, ts: Option<i64>, shell: ShellType) -> Entry {
        Entry::new(cmd, ts.and_then(|s| DateTime::from_timestamp(s, 0)), shell, cmd).unwrap()
    }

    fn find<'a>(entries: &'a [Entry], cmd: &str) -> Vec<&'a Entry> {
        entries.iter().filter(|e| e.command() == cmd).collect()
    }

    #[test]
    fn test_keeps_latest_timestamp() {
        let deduped = dedupe(vec![
            entry("git pull", Some(100), ShellType::Bash),
            entry("git pull", Some(300), ShellType::Zsh),
            entry("git pull", Some(200), ShellType::Fish),
            entry("make", None, ShellType::Bash),
        ]);

        assert_eq!(deduped.len(), 2);
        let kept = find(&deduped, "git pull");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].shell(), ShellType::Zsh);
        assert_eq!(kept[0].timestamp(), DateTime::from_timestamp(300, 0));
    }

    #[test]
    fn test_timestamp_beats_missing_timestamp() {
        let deduped = dedupe(vec![
            entry("cargo run", None, ShellType::Bash),
            entry("cargo run", Some(5), ShellType::Fish),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].shell(), ShellType::Fish);
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let deduped = dedupe(vec![
            entry("npm test", Some(10), ShellType::Zsh),
            entry("npm test", Some(10), ShellType::Bash),
            entry("echo hi", None, ShellType::Fish),
            entry("echo hi", None, ShellType::Bash),
        ]);
        assert_eq!(find(&deduped, "npm test")[0].shell(), ShellType::Zsh);
        assert_eq!(find(&deduped, "echo hi")[0].shell(), ShellType::Fish);
    }

    #[test]
    fn test_exactly_one_survivor_per_command() {
        let mut input = Vec::new();
        for i in 0..50 {
            input.push(entry(&format!("cmd {}", i % 7), Some(i % 3), ShellType::Bash));
        }
        let deduped = dedupe(input);
        assert_eq!(deduped.len(), 7);
        for e in &deduped {
            assert_eq!(find(&deduped, e.command()).len(), 1);
            assert_eq!(e.timestamp(), DateTime::from_timestamp(2, 0));
        }
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let once = dedupe(vec![
            entry("ls -la", Some(1), ShellType::Bash),
            entry("ls -la", Some(2), ShellType::Bash),
        ]);
        let mut twice = dedupe(once.clone());
        let mut once = once;
        sort_newest_first(&mut once);
        sort_newest_first(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut entries = vec![
            entry("b cmd", None, ShellType::Bash),
            entry("old", Some(1), ShellType::Bash),
            entry("new", Some(9), ShellType::Bash),
            entry("a cmd", None, ShellType::Bash),
        ];
        sort_newest_first(&mut entries);
        let order: Vec<&str> = entries.iter().map(|e| e.command()).collect();
        assert_eq!(order, vec!["new", "old", "a cmd", "b cmd"]);
    }
}
