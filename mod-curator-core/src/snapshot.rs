//! The previous run's curated list, indexed by mod id.
//!
//! A missing or unreadable artifact is a cold start, not an error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::model::{CachedRecord, ModId};

/// Explicit per-run cache of previously finalised records.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: HashMap<ModId, CachedRecord>,
}

impl Snapshot {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(snapshot_path = ?path, "No previous curated list, starting cold");
                return Self::default();
            }
            Err(e) => {
                warn!(error = ?e, snapshot_path = ?path, "Failed to read previous curated list, starting cold");
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<CachedRecord>>(&content) {
            Ok(records) => {
                let snapshot = Self::from_records(records);
                info!(snapshot_path = ?path, cached = snapshot.len(), "Loaded previous curated list");
                snapshot
            }
            Err(e) => {
                warn!(error = ?e, snapshot_path = ?path, "Previous curated list is not valid JSON, starting cold");
                Self::default()
            }
        }
    }

    /// Later records win on duplicate ids.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CachedRecord>,
    {
        let records = records
            .into_iter()
            .map(|record| (record.mod_id, record))
            .collect();
        Self { records }
    }

    pub fn get(&self, id: ModId) -> Option<&CachedRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_cold_start() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::load(dir.path().join("nope.json"));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn garbage_file_is_cold_start() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(Snapshot::load(file.path()).is_empty());
    }

    #[test]
    fn records_are_indexed_by_id() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"mod_id": 5, "name": "five", "files": [], "changelogs": {}},
                {"mod_id": "8", "name": "eight"}
            ]"#,
        )
        .unwrap();

        let snapshot = Snapshot::load(file.path());
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(ModId(5)).unwrap().name, "five");
        assert!(snapshot.get(ModId(8)).unwrap().files.is_none());
    }
}
