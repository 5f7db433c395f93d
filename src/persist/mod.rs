//! History persistence
//!
//! The whole history map is written to one JSON file on every persisted
//! message, from inside the hub's write guard, so saves land in the order
//! messages were accepted. The write goes to a sibling `.tmp` file first and
//! is renamed into place; a crash mid-write leaves the previous snapshot
//! intact. Loading is forgiving: a missing or unreadable file just means
//! starting with empty history.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::history::HistoryMap;

/// Saves and restores the history map as a single JSON file
#[derive(Debug, Clone)]
pub struct HistoryPersistence {
    path: PathBuf,
}

impl HistoryPersistence {
    /// Use `path` as the history file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The history file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full map to disk atomically
    ///
    /// Serializes to `<path>.tmp`, then renames over `path`. Readers of the
    /// file never observe a partial write.
    pub fn save(&self, map: &HistoryMap) -> Result<()> {
        let buf = serde_json::to_vec(map).map_err(Error::Serialize)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, &buf)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Read the map back from disk
    ///
    /// Never fails the caller: a missing file is a normal first start and a
    /// corrupt one is logged and discarded, both yielding an empty map.
    pub fn load(&self) -> HistoryMap {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No history file, starting empty");
                return HistoryMap::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read history file, starting empty"
                );
                return HistoryMap::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "History file is not valid JSON, starting empty"
                );
                HistoryMap::default()
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[cfg(test)]
mod tests {
    use crate::history::HistoryEntry;

    use super::*;

    fn sample_map() -> HistoryMap {
        let mut map = HistoryMap::new();
        map.insert(
            "group1".to_string(),
            vec![
                HistoryEntry::new(100.0, "[group1] alice: hello"),
                HistoryEntry::new(101.5, "[group1] bob: hi"),
            ],
        );
        map
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let persist = HistoryPersistence::new(dir.path().join("chat_history.json"));

        persist.save(&sample_map()).unwrap();
        assert_eq!(persist.load(), sample_map());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let persist = HistoryPersistence::new(dir.path().join("never_written.json"));

        assert!(persist.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.json");
        fs::write(&path, b"{definitely not json").unwrap();

        let persist = HistoryPersistence::new(&path);
        assert!(persist.load().is_empty());
    }

    #[test]
    fn test_save_leaves_no_tmp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.json");
        let persist = HistoryPersistence::new(&path);

        persist.save(&sample_map()).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("chat_history.json.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("chat").join("history.json");
        let persist = HistoryPersistence::new(&path);

        persist.save(&sample_map()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let persist = HistoryPersistence::new(dir.path().join("chat_history.json"));

        persist.save(&sample_map()).unwrap();

        let mut second = HistoryMap::new();
        second.insert(
            "group2".to_string(),
            vec![HistoryEntry::new(200.0, "[group2] carol: newer")],
        );
        persist.save(&second).unwrap();

        assert_eq!(persist.load(), second);
    }

    #[test]
    fn test_failed_save_preserves_prior_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.json");
        let persist = HistoryPersistence::new(&path);

        persist.save(&sample_map()).unwrap();

        // A directory squatting on the temp path makes the next write fail
        // before the rename, so the canonical file is never touched
        fs::create_dir(dir.path().join("chat_history.json.tmp")).unwrap();

        let mut second = HistoryMap::new();
        second.insert(
            "group2".to_string(),
            vec![HistoryEntry::new(200.0, "[group2] carol: lost")],
        );
        assert!(persist.save(&second).is_err());

        assert_eq!(persist.load(), sample_map());
    }

    #[test]
    fn test_loads_externally_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.json");
        fs::write(
            &path,
            br#"{"group1": [{"ts": 1700000000.5, "text": "[group1] alice: hi\r\n"}]}"#,
        )
        .unwrap();

        let map = HistoryPersistence::new(&path).load();
        assert_eq!(map["group1"].len(), 1);
        assert_eq!(map["group1"][0].text, "[group1] alice: hi\r\n");
    }
}
