//! Read side of the curated list, for tools that consume it.
//!
//! An id missing from the list means "not curated / no update data", never an error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::model::{FileRecord, FinalRecord, ModId};
use crate::output::OutputError;

#[derive(Debug, Clone, Default)]
pub struct CuratedIndex {
    records: HashMap<ModId, FinalRecord>,
}

impl CuratedIndex {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = FinalRecord>,
    {
        Self {
            records: records.into_iter().map(|r| (r.mod_id, r)).collect(),
        }
    }

    /// A missing artifact yields an empty index.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OutputError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(OutputError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        let records: Vec<FinalRecord> = serde_json::from_str(&content)?;
        Ok(Self::from_records(records))
    }

    pub fn get(&self, mod_id: ModId) -> Option<&FinalRecord> {
        self.records.get(&mod_id)
    }

    pub fn file(&self, mod_id: ModId, file_id: u64) -> Option<&FileRecord> {
        self.get(mod_id)?
            .files
            .iter()
            .find(|file| file.file_id == file_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
