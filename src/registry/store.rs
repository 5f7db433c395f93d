//! Group membership table
//!
//! Plain map of group id to member list. The registry itself is not
//! synchronized: the hub owns it behind the shared state lock, together with
//! the message history, so membership and history always change in step.

use std::collections::HashMap;

use super::member::Member;

/// All group memberships on the server
///
/// Groups exist exactly as long as they have members; joining an unknown
/// group creates it and the last leave removes it. Message history has its
/// own lifetime and survives an empty group.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    /// Map of group id to the sessions currently joined
    groups: HashMap<String, Vec<Member>>,
}

impl GroupRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to a group, creating the group on first join
    ///
    /// Returns the group's member count after the join.
    pub fn join(&mut self, group_id: &str, member: Member) -> usize {
        let members = self.groups.entry(group_id.to_string()).or_default();
        members.push(member);
        members.len()
    }

    /// Remove a session from whichever group it joined
    ///
    /// Returns the group id the session was a member of, or `None` if it
    /// never completed a join. A group emptied by the removal is dropped.
    pub fn leave(&mut self, session_id: u64) -> Option<String> {
        let group_id = self.groups.iter().find_map(|(group_id, members)| {
            members
                .iter()
                .any(|m| m.session_id == session_id)
                .then(|| group_id.clone())
        })?;

        let members = self.groups.get_mut(&group_id)?;
        members.retain(|m| m.session_id != session_id);
        if members.is_empty() {
            self.groups.remove(&group_id);
        }

        Some(group_id)
    }

    /// Clone the current membership of a group
    ///
    /// The snapshot is taken under the hub's lock and walked outside it, so a
    /// slow receiver can never stall other sessions.
    pub fn snapshot(&self, group_id: &str) -> Vec<Member> {
        self.groups.get(group_id).cloned().unwrap_or_default()
    }

    /// Number of members currently in a group
    pub fn member_count(&self, group_id: &str) -> usize {
        self.groups.get(group_id).map_or(0, Vec::len)
    }

    /// Number of groups with at least one member
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total members across all groups
    pub fn total_members(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tokio::sync::mpsc;

    use super::*;

    fn member(session_id: u64, user_id: &str) -> (Member, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Member::new(session_id, user_id, tx), rx)
    }

    #[test]
    fn test_join_creates_group() {
        let mut registry = GroupRegistry::new();
        let (alice, _rx) = member(1, "alice");

        assert_eq!(registry.join("group1", alice), 1);
        assert_eq!(registry.group_count(), 1);
        assert_eq!(registry.member_count("group1"), 1);
    }

    #[test]
    fn test_join_returns_growing_count() {
        let mut registry = GroupRegistry::new();
        let (alice, _a) = member(1, "alice");
        let (bob, _b) = member(2, "bob");

        assert_eq!(registry.join("group1", alice), 1);
        assert_eq!(registry.join("group1", bob), 2);
    }

    #[test]
    fn test_leave_returns_joined_group() {
        let mut registry = GroupRegistry::new();
        let (alice, _a) = member(1, "alice");
        let (bob, _b) = member(2, "bob");
        registry.join("group1", alice);
        registry.join("group1", bob);

        assert_eq!(registry.leave(1), Some("group1".to_string()));
        assert_eq!(registry.member_count("group1"), 1);
        assert_eq!(registry.snapshot("group1")[0].user_id, "bob");
    }

    #[test]
    fn test_last_leave_drops_group() {
        let mut registry = GroupRegistry::new();
        let (alice, _a) = member(1, "alice");
        registry.join("group1", alice);

        registry.leave(1);
        assert_eq!(registry.group_count(), 0);
        assert_eq!(registry.member_count("group1"), 0);
    }

    #[test]
    fn test_leave_without_join_is_none() {
        let mut registry = GroupRegistry::new();
        assert_eq!(registry.leave(42), None);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_changes() {
        let mut registry = GroupRegistry::new();
        let (alice, _a) = member(1, "alice");
        let (bob, _b) = member(2, "bob");
        registry.join("group1", alice);
        registry.join("group1", bob);

        let snapshot = registry.snapshot("group1");
        registry.leave(2);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.member_count("group1"), 1);
    }

    #[test]
    fn test_snapshot_of_unknown_group_is_empty() {
        let registry = GroupRegistry::new();
        assert!(registry.snapshot("nowhere").is_empty());
    }

    #[test]
    fn test_groups_are_independent() {
        let mut registry = GroupRegistry::new();
        let (alice, _a) = member(1, "alice");
        let (bob, _b) = member(2, "bob");
        registry.join("group1", alice);
        registry.join("group2", bob);

        assert_eq!(registry.group_count(), 2);
        assert_eq!(registry.total_members(), 2);

        registry.leave(1);
        assert_eq!(registry.member_count("group2"), 1);
        assert_eq!(registry.group_count(), 1);
    }
}
