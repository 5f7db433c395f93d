//! Group member handle
//!
//! A `Member` is what the registry stores per connected session: enough
//! identity to address the session and an outbox for delivering lines to it.

use bytes::Bytes;
use tokio::sync::mpsc;

/// A session's membership record in a group
///
/// Cloning is cheap: the outbox is a channel sender, so snapshots of a
/// group's membership can be taken under the lock and delivered to outside it.
#[derive(Debug, Clone)]
pub struct Member {
    /// Server-assigned session id, unique per connection
    pub session_id: u64,

    /// Display name the client chose at login
    pub user_id: String,

    /// Queue drained by the session's writer task
    outbox: mpsc::UnboundedSender<Bytes>,
}

impl Member {
    /// Create a member record for a logged-in session
    pub fn new(session_id: u64, user_id: impl Into<String>, outbox: mpsc::UnboundedSender<Bytes>) -> Self {
        Self {
            session_id,
            user_id: user_id.into(),
            outbox,
        }
    }

    /// Queue a line for delivery to this member
    ///
    /// Returns `false` if the session's writer has already gone away. Delivery
    /// is best-effort; one dead peer never fails a broadcast.
    pub fn send(&self, line: Bytes) -> bool {
        self.outbox.send(line).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_queues_line() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let member = Member::new(1, "alice", tx);

        assert!(member.send(Bytes::from_static(b"hello\r\n")));
        assert_eq!(rx.try_recv().unwrap(), Bytes::from_static(b"hello\r\n"));
    }

    #[test]
    fn test_send_after_writer_gone_reports_failure() {
        let (tx, rx) = mpsc::unbounded_channel();
        let member = Member::new(1, "alice", tx);
        drop(rx);

        assert!(!member.send(Bytes::from_static(b"hello\r\n")));
    }

    #[test]
    fn test_clone_shares_outbox() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let member = Member::new(7, "bob", tx);
        let copy = member.clone();

        assert!(copy.send(Bytes::from_static(b"via clone\r\n")));
        assert_eq!(rx.try_recv().unwrap(), Bytes::from_static(b"via clone\r\n"));
        assert_eq!(copy.session_id, 7);
        assert_eq!(copy.user_id, "bob");
    }
}
