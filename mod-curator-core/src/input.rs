//! Loads the tracked list: the hand-maintained JSON array of
//! `{id, state, warningMessage}` rows naming every mod the curated list covers.
//!
//! There is no partial-input mode. If the file cannot be read or parsed the run
//! stops before any catalog call.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::model::{EntryState, ModId, TrackedEntry};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read tracked list {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tracked list {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result of loading the tracked list.
#[derive(Debug, Clone, Default)]
pub struct TrackedInput {
    /// Entries with a usable id, in file order.
    pub entries: Vec<TrackedEntry>,
    /// Raw ids dropped at load time (blank or not a catalog id).
    pub rejected: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    state: EntryState,
    #[serde(rename = "warningMessage", default)]
    warning_message: Option<String>,
}

pub fn load_tracked_entries<P: AsRef<Path>>(path: P) -> Result<TrackedInput, InputError> {
    let path = path.as_ref();
    info!(input_path = ?path, "Loading tracked list");

    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, input_path = ?path, "Failed to read tracked list");
        InputError::Read {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    parse_tracked_entries(&content).map_err(|e| {
        error!(error = ?e, input_path = ?path, "Failed to parse tracked list");
        InputError::Parse {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

pub fn parse_tracked_entries(content: &str) -> Result<TrackedInput, serde_json::Error> {
    let raw: Vec<RawEntry> = serde_json::from_str(content)?;
    let mut input = TrackedInput::default();

    for entry in raw {
        let id = match entry.id {
            Some(RawId::Text(s)) => s.trim().to_string(),
            Some(RawId::Number(n)) => n.to_string(),
            Some(RawId::Other(value)) => value.to_string(),
            None => String::new(),
        };
        if id.is_empty() {
            input.rejected.push(id);
            continue;
        }
        match id.parse::<ModId>() {
            Ok(mod_id) => input.entries.push(TrackedEntry {
                id: mod_id,
                state: entry.state,
                warning_message: entry.warning_message.unwrap_or_default(),
            }),
            Err(_) => {
                warn!(raw_id = %id, "Tracked entry id is not a catalog id, skipping");
                input.rejected.push(id);
            }
        }
    }

    info!(
        tracked = input.entries.len(),
        rejected = input.rejected.len(),
        "Tracked list loaded"
    );
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_missing_ids_are_dropped() {
        let input = parse_tracked_entries(
            r#"[
                {"id": "12", "state": "normal", "warningMessage": ""},
                {"id": "   ", "state": "normal", "warningMessage": ""},
                {"state": "warning"},
                {"id": " 7 ", "state": "warning", "warningMessage": "crashes on load"}
            ]"#,
        )
        .unwrap();

        let ids: Vec<u64> = input.entries.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![12, 7]);
        assert_eq!(input.rejected.len(), 2);
        assert_eq!(input.entries[1].state, EntryState::Warning);
        assert_eq!(input.entries[1].warning_message, "crashes on load");
    }

    #[test]
    fn numeric_ids_and_missing_overlay_fields_are_accepted() {
        let input = parse_tracked_entries(r#"[{"id": 99}]"#).unwrap();
        assert_eq!(input.entries, vec![TrackedEntry::normal(ModId(99))]);
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        let input = parse_tracked_entries(r#"[{"id": "abc"}]"#).unwrap();
        assert!(input.entries.is_empty());
        assert_eq!(input.rejected, vec!["abc".to_string()]);
    }

    #[test]
    fn out_of_range_numbers_are_rejected_without_failing_the_load() {
        let input = parse_tracked_entries(
            r#"[{"id": "1"}, {"id": -5}, {"id": 1.5}, {"id": 18446744073709551616}, {"id": true}, {"id": "abc"}]"#,
        )
        .unwrap();

        assert_eq!(input.entries.len(), 1);
        assert_eq!(input.entries[0].id, ModId(1));
        assert_eq!(input.rejected.len(), 5);
        assert!(input.rejected.contains(&"-5".to_string()));
        assert!(input.rejected.contains(&"1.5".to_string()));
        assert!(input.rejected.contains(&"abc".to_string()));
    }

    #[test]
    fn unknown_state_is_a_parse_error() {
        assert!(parse_tracked_entries(r#"[{"id": "1", "state": "broken"}]"#).is_err());
    }
}
