//! Statistics for chat sessions and the server

use std::time::Duration;

/// Session-level statistics
///
/// Collected over a connection's lifetime and logged when it closes.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Lines read from the client, prompts and commands included
    pub lines_received: u64,
    /// Chat messages accepted and relayed to the group
    pub messages_published: u64,
    /// Lines the writer task put on the socket
    pub lines_delivered: u64,
    /// Connection duration
    pub duration: Duration,
}

impl SessionStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Published messages per minute over the session
    pub fn messages_per_minute(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.messages_published as f64 * 60.0 / secs
        } else {
            0.0
        }
    }
}

/// Hub-level snapshot
///
/// Taken under the hub's read guard, so the membership and history numbers
/// are mutually consistent.
#[derive(Debug, Clone, Default)]
pub struct HubStats {
    /// Groups with at least one member
    pub groups: usize,
    /// Members across all groups
    pub members: usize,
    /// Groups holding retained history
    pub history_groups: usize,
    /// Retained history entries in total
    pub history_entries: usize,
    /// Lines queued to members since startup
    pub messages_relayed: u64,
    /// History saves that failed since startup
    pub save_failures: u64,
}

/// Server-wide statistics
#[derive(Debug, Clone, Default)]
pub struct ServerStats {
    /// Total connections ever accepted
    pub total_connections: u64,
    /// Currently open connections
    pub active_connections: u64,
    /// Time since the listener started
    pub uptime: Duration,
}

impl ServerStats {
    pub fn new() -> Self {
        Self::default()
    }
}
