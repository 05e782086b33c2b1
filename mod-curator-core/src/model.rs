//! Data model shared by every pipeline stage.
//!
//! Three shapes matter on disk and on the wire:
//! - [`TrackedEntry`]: one row of the hand-maintained tracked list (input artifact).
//! - [`CachedRecord`]: a record as read back from the previous curated list.
//! - [`FinalRecord`]: a record as written to the curated list (output artifact).
//!
//! `CachedRecord` keeps `files`/`changelogs` optional so the planner can tell
//! a collection that was never written apart from one that is legitimately empty
//! (see [`Collection`]). `FinalRecord` never omits them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Catalog identifier of a mod. Serialised as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModId(pub u64);

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(ModId)
    }
}

// Older artifacts wrote ids as strings; accept both.
impl<'de> Deserialize<'de> for ModId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ModId(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Curator-assigned overlay state for a tracked mod.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    #[default]
    Normal,
    Warning,
}

/// A validated row of the tracked list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    pub id: ModId,
    pub state: EntryState,
    pub warning_message: String,
}

impl TrackedEntry {
    pub fn normal(id: ModId) -> Self {
        Self {
            id,
            state: EntryState::Normal,
            warning_message: String::new(),
        }
    }
}

/// One downloadable file of a mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_id: u64,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uploaded_timestamp: i64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Version string -> list of change descriptions.
pub type Changelogs = BTreeMap<String, Vec<String>>;

/// Wire shape of the changelog endpoint. The catalog answers `[]` rather
/// than `{}` for a mod without changelogs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChangelogPayload {
    Map(Changelogs),
    List(Vec<serde_json::Value>),
}

impl From<ChangelogPayload> for Changelogs {
    fn from(payload: ChangelogPayload) -> Self {
        match payload {
            ChangelogPayload::Map(map) => map,
            ChangelogPayload::List(_) => Changelogs::new(),
        }
    }
}

/// Raw per-mod info as returned by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteInfo {
    #[serde(default)]
    pub mod_id: Option<ModId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_timestamp: i64,
    #[serde(default)]
    pub created_timestamp: i64,
}

impl RemoteInfo {
    /// A mod is kept only while it has a name and is published.
    pub fn is_publishable(&self) -> bool {
        let named = self.name.as_deref().is_some_and(|n| !n.trim().is_empty());
        named && self.status.as_deref() == Some("published")
    }
}

/// A record loaded from the previous curated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRecord {
    pub mod_id: ModId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub updated_timestamp: i64,
    #[serde(default)]
    pub created_timestamp: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<FileRecord>>,
    #[serde(default)]
    pub changelogs: Option<Changelogs>,
}

/// Presence of a collection in a cached record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Absent,
    Empty,
    Populated,
}

impl Collection {
    fn from_len(len: Option<usize>) -> Self {
        match len {
            None => Collection::Absent,
            Some(0) => Collection::Empty,
            Some(_) => Collection::Populated,
        }
    }
}

impl CachedRecord {
    pub fn files_state(&self) -> Collection {
        Collection::from_len(self.files.as_ref().map(Vec::len))
    }

    pub fn changelogs_state(&self) -> Collection {
        Collection::from_len(self.changelogs.as_ref().map(BTreeMap::len))
    }
}

/// A record as written to the curated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRecord {
    pub mod_id: ModId,
    pub name: String,
    pub summary: Option<String>,
    pub version: Option<String>,
    pub picture_url: Option<String>,
    pub author: Option<String>,
    pub updated_timestamp: i64,
    pub created_timestamp: i64,
    pub description: Option<String>,
    pub files: Vec<FileRecord>,
    pub changelogs: Changelogs,
    #[serde(default)]
    pub state: EntryState,
    #[serde(rename = "warningMessage", default)]
    pub warning_message: String,
}

impl From<FinalRecord> for CachedRecord {
    fn from(record: FinalRecord) -> Self {
        CachedRecord {
            mod_id: record.mod_id,
            name: record.name,
            summary: record.summary,
            version: record.version,
            picture_url: record.picture_url,
            author: record.author,
            updated_timestamp: record.updated_timestamp,
            created_timestamp: record.created_timestamp,
            description: record.description,
            files: Some(record.files),
            changelogs: Some(record.changelogs),
        }
    }
}
