//! Chat hub implementation
//!
//! One `RwLock` guards membership and history together, so every publish
//! sees a consistent pair: the entry lands in history, the snapshot of the
//! file hits disk, and the member list for fan-out is taken, all under the
//! same write guard. Actual socket delivery happens after the guard drops.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::RwLock;

use crate::history::{HistoryEntry, HistoryStore, DEFAULT_HISTORY_TTL};
use crate::persist::HistoryPersistence;
use crate::protocol::text::{replay_empty, replay_footer, replay_header};
use crate::registry::{GroupRegistry, Member};
use crate::stats::HubStats;

/// Membership and history, always locked as a unit
#[derive(Debug)]
struct HubState {
    registry: GroupRegistry,
    history: HistoryStore,
}

/// Central coordinator for groups, history and persistence
///
/// Sessions hold the hub behind an `Arc` and call into it for every join,
/// leave, broadcast and replay.
#[derive(Debug)]
pub struct ChatHub {
    /// Shared state guarded by one lock
    state: RwLock<HubState>,

    /// History file reader/writer
    persist: HistoryPersistence,

    /// Retention window, fixed at construction
    ttl: Duration,

    /// Lines queued to members since startup, across all groups
    messages_relayed: AtomicU64,

    /// Saves that failed since startup; broadcasting continues regardless
    save_failures: AtomicU64,
}

impl ChatHub {
    /// Create a hub with the default retention window
    pub fn new(persist: HistoryPersistence) -> Self {
        Self::with_ttl(persist, DEFAULT_HISTORY_TTL)
    }

    /// Create a hub with a custom retention window
    pub fn with_ttl(persist: HistoryPersistence, ttl: Duration) -> Self {
        Self {
            state: RwLock::new(HubState {
                registry: GroupRegistry::new(),
                history: HistoryStore::with_ttl(ttl),
            }),
            persist,
            ttl,
            messages_relayed: AtomicU64::new(0),
            save_failures: AtomicU64::new(0),
        }
    }

    /// The retention window in effect
    pub fn history_ttl(&self) -> Duration {
        self.ttl
    }

    /// Where history is saved
    pub fn history_path(&self) -> &Path {
        self.persist.path()
    }

    /// Load the history file into the store
    ///
    /// Runs once at startup, before the listener accepts anyone. Entries past
    /// the retention window are dropped on the way in. Returns the number of
    /// entries restored.
    pub async fn restore(&self) -> usize {
        let map = self.persist.load();
        let now = crate::unix_now();

        let mut state = self.state.write().await;
        let entries = state.history.load(map, now);
        if entries > 0 {
            tracing::info!(
                groups = state.history.group_count(),
                entries,
                path = %self.persist.path().display(),
                "Restored chat history"
            );
        }
        entries
    }

    /// Add a member to a group, creating the group on first join
    ///
    /// Returns the group's member count after the join.
    pub async fn join(&self, group_id: &str, member: Member) -> usize {
        let session_id = member.session_id;
        let user_id = member.user_id.clone();

        let mut state = self.state.write().await;
        let members = state.registry.join(group_id, member);

        tracing::info!(
            group = %group_id,
            user = %user_id,
            session_id = session_id,
            members = members,
            "Member joined group"
        );
        members
    }

    /// Remove a session from its group
    ///
    /// Returns the group id it belonged to, or `None` for sessions that never
    /// finished the handshake.
    pub async fn leave(&self, session_id: u64) -> Option<String> {
        let mut state = self.state.write().await;
        let group_id = state.registry.leave(session_id)?;

        tracing::info!(group = %group_id, session_id = session_id, "Member left group");
        Some(group_id)
    }

    /// Broadcast a finished wire line to a group, optionally recording it
    ///
    /// `text` must be a complete line, terminator included: history keeps it
    /// verbatim and members receive the same bytes. With `persist` set, the
    /// entry is appended to history and the whole map is saved to disk before
    /// the membership snapshot is taken, all under one write guard; saves
    /// land on the file in publish order. A failed save is logged and
    /// counted, never propagated, because delivery to connected members
    /// matters more than the snapshot.
    ///
    /// `exclude` skips one session, typically the sender. Returns how many
    /// members the line was queued for.
    pub async fn publish(
        &self,
        group_id: &str,
        text: &str,
        exclude: Option<u64>,
        persist: bool,
    ) -> usize {
        let line = Bytes::from(text.to_string());

        let members = if persist {
            let mut state = self.state.write().await;
            state
                .history
                .append(group_id, HistoryEntry::new(crate::unix_now(), text));

            if let Err(e) = self.persist.save(state.history.all()) {
                self.save_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    path = %self.persist.path().display(),
                    error = %e,
                    "Failed to save history"
                );
            }

            state.registry.snapshot(group_id)
        } else {
            self.state.read().await.registry.snapshot(group_id)
        };

        let mut queued = 0;
        for member in &members {
            if exclude == Some(member.session_id) {
                continue;
            }
            if member.send(line.clone()) {
                queued += 1;
            } else {
                tracing::debug!(
                    session_id = member.session_id,
                    group = %group_id,
                    "Skipped member with closed outbox"
                );
            }
        }
        self.messages_relayed.fetch_add(queued as u64, Ordering::Relaxed);
        queued
    }

    /// Send the retained history of a group to one member
    ///
    /// The window is snapshotted under a read guard and written out after it
    /// is released; a concurrent broadcast may interleave between replayed
    /// lines but never inside one. Returns the number of entries replayed.
    pub async fn replay(&self, group_id: &str, member: &Member) -> usize {
        let now = crate::unix_now();
        let recent = self.state.read().await.history.get_recent(group_id, now);

        if recent.is_empty() {
            member.send(Bytes::from(replay_empty(self.ttl)));
            return 0;
        }

        member.send(Bytes::from(replay_header(group_id, self.ttl)));
        for entry in &recent {
            member.send(Bytes::from(entry.text.clone()));
        }
        member.send(Bytes::from(replay_footer()));
        recent.len()
    }

    /// Snapshot of hub-wide counters
    pub async fn stats(&self) -> HubStats {
        let state = self.state.read().await;
        HubStats {
            groups: state.registry.group_count(),
            members: state.registry.total_members(),
            history_groups: state.history.group_count(),
            history_entries: state.history.entry_count(),
            messages_relayed: self.messages_relayed.load(Ordering::Relaxed),
            save_failures: self.save_failures.load(Ordering::Relaxed),
        }
    }
}
