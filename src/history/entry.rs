//! A single stored chat message

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One line of group history
///
/// The wire form is what gets stored: `text` is the fully rendered
/// `[group] user: message` line, and `ts` is seconds since the Unix epoch as
/// a float. Those two field names are also the on-disk JSON schema, so a
/// history file written by an older deployment loads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unix timestamp in seconds, fractional part included
    pub ts: f64,

    /// Rendered chat line, exactly as sent on the wire
    pub text: String,
}

impl HistoryEntry {
    /// Create an entry stamped at `ts`
    pub fn new(ts: f64, text: impl Into<String>) -> Self {
        Self {
            ts,
            text: text.into(),
        }
    }

    /// Seconds elapsed since this entry was recorded
    pub fn age(&self, now: f64) -> f64 {
        now - self.ts
    }

    /// Whether this entry is still inside the retention window
    ///
    /// The boundary is inclusive: an entry aged exactly `ttl` is kept.
    pub fn is_fresh(&self, now: f64, ttl: Duration) -> bool {
        self.age(now) <= ttl.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age() {
        let entry = HistoryEntry::new(100.0, "[group1] alice: hi");
        assert_eq!(entry.age(130.5), 30.5);
    }

    #[test]
    fn test_is_fresh_inside_window() {
        let entry = HistoryEntry::new(100.0, "[group1] alice: hi");
        assert!(entry.is_fresh(100.0, Duration::from_secs(900)));
        assert!(entry.is_fresh(999.0, Duration::from_secs(900)));
    }

    #[test]
    fn test_is_fresh_at_exact_boundary() {
        let entry = HistoryEntry::new(100.0, "[group1] alice: hi");
        assert!(entry.is_fresh(1000.0, Duration::from_secs(900)));
        assert!(!entry.is_fresh(1000.1, Duration::from_secs(900)));
    }

    #[test]
    fn test_json_field_names_are_stable() {
        let entry = HistoryEntry::new(1700000000.25, "[group1] alice: hi");
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"ts\":"));
        assert!(json.contains("\"text\":"));

        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_loads_hand_written_json() {
        let entry: HistoryEntry =
            serde_json::from_str(r#"{"ts": 1700000000.0, "text": "[g] u: hello"}"#).unwrap();
        assert_eq!(entry.ts, 1700000000.0);
        assert_eq!(entry.text, "[g] u: hello");
    }
}
