//! High-level pipeline: tracked list + previous curated list + catalog → new curated list.
//!
//! This module orchestrates one run:
//!   - Loads the tracked list (fatal on failure) and the previous curated list (cold start on failure)
//!   - Fetches the change signal once, before any grouping
//!   - Plans reuse vs refetch per mod
//!   - Runs the batch fetch executor against a concrete [`CatalogApi`]
//!   - Renders and persists the curated list only when its bytes change
//!   - Returns a [`SyncReport`] of what happened
//!
//! # Error Handling
//! Only three things end a run early: an unreadable tracked list, a rate limit the
//! configured policy does not absorb, and a failed write. Each returns a
//! [`SyncFailure`] carrying the report accumulated so far; nothing is written.
//!
//! # Navigation
//! - Main entrypoint: [`synchronise`]
//! - Supporting types: [`SyncError`], [`SyncFailure`], [`SyncReport`].

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{error, info};

use crate::change_signal::fetch_change_signal;
use crate::config::SyncConfig;
use crate::contract::CatalogApi;
use crate::fetch::{fetch_all, FetchError};
use crate::input::{load_tracked_entries, InputError};
use crate::output::{self, OutputError};
use crate::planner::plan;
use crate::snapshot::Snapshot;

pub use crate::report::SyncReport;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// A failed run and the partial report up to the point of failure.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SyncFailure {
    pub error: SyncError,
    pub partial: SyncReport,
}

impl SyncFailure {
    fn new(error: impl Into<SyncError>, partial: SyncReport) -> Self {
        Self {
            error: error.into(),
            partial,
        }
    }
}

pub async fn synchronise<C>(config: &SyncConfig, catalog: &C) -> Result<SyncReport, SyncFailure>
where
    C: CatalogApi + ?Sized,
{
    info!("[SYNC] Starting curated list synchronisation");
    let mut report = SyncReport::default();

    let input = match load_tracked_entries(&config.input) {
        Ok(input) => input,
        Err(e) => {
            error!(error = %e, "[SYNC][ERROR] Tracked list unusable");
            return Err(SyncFailure::new(e, report));
        }
    };
    report.rejected_at_input = input.rejected;
    report.tracked = input
        .entries
        .iter()
        .map(|entry| entry.id)
        .collect::<BTreeSet<_>>()
        .len();

    let snapshot = Snapshot::load(&config.output);
    let changed = fetch_change_signal(catalog, config.fetch.updated_period).await;

    let work = plan(
        &input.entries,
        &snapshot,
        &changed,
        config.fetch.repair_empty,
    );
    report.reused = work.reuse.len();
    let mut records = work.reuse;

    let outcomes = match fetch_all(catalog, &work.fetch, &snapshot, &config.fetch).await {
        Ok(outcomes) => outcomes,
        Err(abort) => {
            for outcome in &abort.completed {
                report.record(outcome);
            }
            return Err(SyncFailure::new(abort.error, report));
        }
    };
    for outcome in outcomes {
        report.record(&outcome);
        records.extend(outcome.into_record());
    }

    // plan() yields one work item per id, so records are already unique
    report.written = records.len();
    let rendered = match output::render(records) {
        Ok(rendered) => rendered,
        Err(e) => return Err(SyncFailure::new(OutputError::from(e), report)),
    };

    match output::persist(&config.output, &rendered, config.dry_run) {
        Ok(outcome) => report.write = Some(outcome),
        Err(e) => return Err(SyncFailure::new(e, report)),
    }

    info!(
        tracked = report.tracked,
        written = report.written,
        reused = report.reused,
        fetched = report.fetched,
        false_alarms = report.false_alarms,
        removed = report.removed.len(),
        write = ?report.write,
        "[SYNC] Synchronisation complete"
    );
    Ok(report)
}
