//! Per-group message history with TTL retention
//!
//! History is pruned lazily: appending to a group re-filters that group's
//! entries against the retention window, and loading a file from disk filters
//! everything once. There is no background sweep; an idle group's stale
//! entries simply never get read, because reads filter by age too.

use std::collections::HashMap;
use std::time::Duration;

use super::entry::HistoryEntry;

/// Retention window applied to stored messages (15 minutes)
pub const DEFAULT_HISTORY_TTL: Duration = Duration::from_secs(900);

/// Map of group id to that group's retained entries, oldest first
pub type HistoryMap = HashMap<String, Vec<HistoryEntry>>;

/// All retained chat history, grouped by group id
///
/// Owned by the hub behind the same lock as the membership registry, so a
/// message is appended and broadcast against one consistent view.
#[derive(Debug)]
pub struct HistoryStore {
    /// Retention window
    ttl: Duration,

    /// Entries per group, in append order
    groups: HistoryMap,
}

impl HistoryStore {
    /// Create an empty store with the default retention window
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_HISTORY_TTL)
    }

    /// Create an empty store with a custom retention window
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            groups: HashMap::new(),
        }
    }

    /// The retention window in effect
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Record a message and re-filter that group against the window
    ///
    /// The entry's own timestamp is the pruning reference, so the new entry
    /// always survives. Other groups are left alone until their next append.
    pub fn append(&mut self, group_id: &str, entry: HistoryEntry) {
        let now = entry.ts;
        let ttl = self.ttl;
        let entries = self.groups.entry(group_id.to_string()).or_default();
        entries.push(entry);
        entries.retain(|e| e.is_fresh(now, ttl));
    }

    /// Entries of a group still inside the window as of `now`, oldest first
    ///
    /// Read-only: stale entries are skipped, not removed.
    pub fn get_recent(&self, group_id: &str, now: f64) -> Vec<HistoryEntry> {
        self.groups
            .get(group_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.is_fresh(now, self.ttl))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Replace the store's contents with a map loaded from disk
    ///
    /// Every group is filtered against the window as of `now`; entries with
    /// empty text and groups left empty are dropped. Returns the number of
    /// entries retained.
    pub fn load(&mut self, map: HistoryMap, now: f64) -> usize {
        self.groups = map;
        self.groups.retain(|_, entries| {
            entries.retain(|e| e.is_fresh(now, self.ttl) && !e.text.is_empty());
            !entries.is_empty()
        });
        self.entry_count()
    }

    /// Borrow the full map, e.g. to persist it
    pub fn all(&self) -> &HistoryMap {
        &self.groups
    }

    /// Number of groups holding at least one entry
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total retained entries across all groups
    pub fn entry_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether nothing is retained at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
