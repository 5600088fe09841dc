//! Append-only collection of mood entries persisted under a single key.

use crate::models::MoodEntry;
use crate::storage::{KeyValueStore, load_json, persist_json};
use tracing::{error, warn};

pub const ENTRIES_KEY: &str = "moodEntries";

/// Reads the persisted entries. Missing or unreadable values yield an empty
/// sequence; the failure is logged.
pub async fn load(store: &dyn KeyValueStore) -> Vec<MoodEntry> {
    match load_json(store, ENTRIES_KEY).await {
        Ok(Some(entries)) => entries,
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!(key = err.key(), "falling back to empty entries: {err}");
            Vec::new()
        }
    }
}

/// Returns a new sequence with `entry` at the end. `entries` is left untouched.
pub fn append(entries: &[MoodEntry], entry: MoodEntry) -> Vec<MoodEntry> {
    let mut next = Vec::with_capacity(entries.len() + 1);
    next.extend_from_slice(entries);
    next.push(entry);
    next
}

/// Writes the full sequence. Failures are logged and otherwise ignored; the
/// in-memory copy stays authoritative. Returns whether the write succeeded.
pub async fn persist(store: &dyn KeyValueStore, entries: &[MoodEntry]) -> bool {
    match persist_json(store, ENTRIES_KEY, entries).await {
        Ok(()) => true,
        Err(err) => {
            error!(key = err.key(), "failed to persist entries: {err}");
            false
        }
    }
}

/// Millisecond timestamp id, bumped past the last id so ids stay strictly
/// increasing even when two entries are created within the same millisecond.
pub fn next_entry_id(now_ms: i64, entries: &[MoodEntry]) -> String {
    let last = entries
        .last()
        .and_then(|entry| entry.id.parse::<i64>().ok())
        .unwrap_or(i64::MIN);
    let id = if now_ms > last { now_ms } else { last.saturating_add(1) };
    id.to_string()
}
