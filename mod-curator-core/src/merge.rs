//! Builds the final record shape from cached or remote data plus the
//! curator's warning overlay.

use crate::model::{
    CachedRecord, Changelogs, EntryState, FileRecord, FinalRecord, ModId, RemoteInfo, TrackedEntry,
};

fn overlay_fields(overlay: Option<&TrackedEntry>) -> (EntryState, String) {
    match overlay {
        Some(entry) => (entry.state, entry.warning_message.clone()),
        None => (EntryState::Normal, String::new()),
    }
}

/// Carries a cached record forward unchanged apart from the overlay.
pub fn finalize(cached: &CachedRecord, overlay: Option<&TrackedEntry>) -> FinalRecord {
    let (state, warning_message) = overlay_fields(overlay);
    FinalRecord {
        mod_id: cached.mod_id,
        name: cached.name.clone(),
        summary: cached.summary.clone(),
        version: cached.version.clone(),
        picture_url: cached.picture_url.clone(),
        author: cached.author.clone(),
        updated_timestamp: cached.updated_timestamp,
        created_timestamp: cached.created_timestamp,
        description: cached.description.clone(),
        files: cached.files.clone().unwrap_or_default(),
        changelogs: cached.changelogs.clone().unwrap_or_default(),
        state,
        warning_message,
    }
}

/// Combines freshly fetched info with a file list and changelogs.
///
/// `mod_id` is the tracked id; the id echoed in `info` is not trusted.
pub fn from_remote(
    mod_id: ModId,
    info: RemoteInfo,
    files: Vec<FileRecord>,
    changelogs: Changelogs,
    overlay: Option<&TrackedEntry>,
) -> FinalRecord {
    let (state, warning_message) = overlay_fields(overlay);
    FinalRecord {
        mod_id,
        name: info.name.unwrap_or_default(),
        summary: info.summary,
        version: info.version,
        picture_url: info.picture_url,
        author: info.author,
        updated_timestamp: info.updated_timestamp,
        created_timestamp: info.created_timestamp,
        description: info.description,
        files,
        changelogs,
        state,
        warning_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached() -> CachedRecord {
        CachedRecord {
            mod_id: ModId(1),
            name: "Cached".into(),
            summary: Some("old".into()),
            version: Some("1.0".into()),
            picture_url: None,
            author: Some("someone".into()),
            updated_timestamp: 10,
            created_timestamp: 5,
            description: None,
            files: None,
            changelogs: Some(Changelogs::new()),
        }
    }

    #[test]
    fn missing_overlay_defaults_to_normal() {
        let record = finalize(&cached(), None);
        assert_eq!(record.state, EntryState::Normal);
        assert_eq!(record.warning_message, "");
        assert!(record.files.is_empty());
    }

    #[test]
    fn overlay_is_applied() {
        let overlay = TrackedEntry {
            id: ModId(1),
            state: EntryState::Warning,
            warning_message: "needs patch".into(),
        };
        let record = finalize(&cached(), Some(&overlay));
        assert_eq!(record.state, EntryState::Warning);
        assert_eq!(record.warning_message, "needs patch");
        assert_eq!(record.summary.as_deref(), Some("old"));
    }

    #[test]
    fn remote_fields_replace_top_level_data() {
        let info = RemoteInfo {
            mod_id: Some(ModId(999)),
            name: Some("Fresh".into()),
            status: Some("published".into()),
            summary: Some("new".into()),
            updated_timestamp: 20,
            ..Default::default()
        };
        let record = from_remote(ModId(1), info, vec![], Changelogs::new(), None);
        assert_eq!(record.mod_id, ModId(1));
        assert_eq!(record.name, "Fresh");
        assert_eq!(record.updated_timestamp, 20);
    }
}
