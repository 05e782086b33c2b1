//! Deterministic rendering and idempotent persistence of the curated list.
//!
//! The artifact is only touched when its bytes would change, and a write either
//! lands completely (temp file renamed into place) or not at all.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::model::{FinalRecord, ModId};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("curated list JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read curated list {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write curated list {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Existing artifact already had identical bytes.
    Unchanged,
    Written,
    /// Content differed but the run was a dry run.
    DryRun,
}

/// Sorts by numeric id (collapsing duplicate ids, last wins) and pretty-prints
/// with a trailing newline.
pub fn render(records: Vec<FinalRecord>) -> Result<String, serde_json::Error> {
    let unique: BTreeMap<ModId, FinalRecord> = records
        .into_iter()
        .map(|record| (record.mod_id, record))
        .collect();
    let sorted: Vec<&FinalRecord> = unique.values().collect();

    let mut rendered = serde_json::to_string_pretty(&sorted)?;
    rendered.push('\n');
    Ok(rendered)
}

pub fn persist<P: AsRef<Path>>(
    path: P,
    rendered: &str,
    dry_run: bool,
) -> Result<WriteOutcome, OutputError> {
    let path = path.as_ref();

    if let Ok(existing) = fs::read(path) {
        if existing == rendered.as_bytes() {
            info!(output_path = ?path, "[OUTPUT] Curated list unchanged, skipping write");
            return Ok(WriteOutcome::Unchanged);
        }
    }

    if dry_run {
        info!(output_path = ?path, bytes = rendered.len(), "[OUTPUT] Dry run, curated list not written");
        return Ok(WriteOutcome::DryRun);
    }

    write_atomically(path, rendered).map_err(|e| {
        error!(error = ?e, output_path = ?path, "[OUTPUT][ERROR] Failed to write curated list");
        OutputError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    info!(output_path = ?path, bytes = rendered.len(), "[OUTPUT] Curated list written");
    Ok(WriteOutcome::Written)
}

fn write_atomically(path: &Path, rendered: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(rendered.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    debug!(output_path = ?path, "[OUTPUT] Renamed temp file into place");
    Ok(())
}
