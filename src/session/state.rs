//! Session state machine
//!
//! Tracks a chat connection from accept to close. The login handshake is
//! strictly linear, so transitions only fire from the phase they belong to
//! and anything else is ignored.

use std::net::SocketAddr;
use std::time::Instant;

use crate::stats::SessionStats;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// TCP connected, banner not sent yet
    Connected,
    /// Banner sent, waiting for the user id line
    AwaitingUserId,
    /// User id accepted, waiting for the group id line
    AwaitingGroupId,
    /// Member of a group, relaying chat lines
    Joined,
    /// Session closed
    Closed,
}

/// Complete session state
#[derive(Debug)]
pub struct SessionState {
    /// Unique session ID
    pub id: u64,

    /// Remote peer address
    pub peer_addr: SocketAddr,

    /// Current phase
    pub phase: SessionPhase,

    /// Connection start time
    pub connected_at: Instant,

    /// Chosen user id (after the first prompt)
    user_id: Option<String>,

    /// Joined group (after the second prompt)
    group_id: Option<String>,

    /// Counters for the close log line
    pub stats: SessionStats,
}

impl SessionState {
    /// Create a new session state
    pub fn new(id: u64, peer_addr: SocketAddr) -> Self {
        Self {
            id,
            peer_addr,
            phase: SessionPhase::Connected,
            connected_at: Instant::now(),
            user_id: None,
            group_id: None,
            stats: SessionStats::new(),
        }
    }

    /// Banner sent, start prompting
    pub fn begin_login(&mut self) {
        if self.phase == SessionPhase::Connected {
            self.phase = SessionPhase::AwaitingUserId;
        }
    }

    /// Accept the user id line
    pub fn set_user_id(&mut self, user_id: &str) {
        if self.phase == SessionPhase::AwaitingUserId {
            self.user_id = Some(user_id.to_string());
            self.phase = SessionPhase::AwaitingGroupId;
        }
    }

    /// Accept the group id line and enter the group
    pub fn join_group(&mut self, group_id: &str) {
        if self.phase == SessionPhase::AwaitingGroupId {
            self.group_id = Some(group_id.to_string());
            self.phase = SessionPhase::Joined;
        }
    }

    /// Close the session, from any phase
    pub fn close(&mut self) {
        self.phase = SessionPhase::Closed;
    }

    /// The chosen user id, if the handshake got that far
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The joined group, if the handshake completed
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    /// Whether the session completed the handshake
    pub fn is_joined(&self) -> bool {
        self.phase == SessionPhase::Joined
    }

    /// Get session duration
    pub fn duration(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }
}
