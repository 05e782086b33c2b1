//! Batch fetch executor: refetches planned mods from the catalog in fixed-size
//! groups, pausing between groups to stay under the per-key rate limit.
//!
//! Within a group every mod runs concurrently; the steps for one mod are
//! sequential (info, then files, then changelogs). Results are only folded into
//! the caller's collections once the whole group has completed, so no state is
//! shared between in-flight tasks.
//!
//! # Outcomes
//! - removed when the catalog reports the mod gone, unnamed, or not published
//! - false alarm when the info timestamp equals the cached one and the cached
//!   record is fully populated (files and changelogs reused, no auxiliary calls)
//! - kept/skipped when the info call itself is unavailable
//! - fetched otherwise
//!
//! A rate limit on the info call either aborts the run or is retried, depending
//! on [`RateLimitPolicy`].

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{FetchConfig, RateLimitPolicy};
use crate::contract::{CatalogApi, InfoOutcome};
use crate::merge;
use crate::model::{CachedRecord, Changelogs, FileRecord, FinalRecord, ModId, RemoteInfo};
use crate::planner::FetchItem;
use crate::snapshot::Snapshot;

/// Why a tracked mod was dropped from the curated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalReason {
    /// The catalog no longer serves the mod (HTTP 403/404/410 or empty body).
    Missing { status: Option<u16> },
    /// The info document has no name.
    Unnamed,
    /// The mod exists but is not published (hidden, under moderation, ...).
    NotPublished { status: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Info, files and changelogs were fetched.
    Fetched(FinalRecord),
    /// Info was fetched; files and changelogs came from the cache.
    FalseAlarm(FinalRecord),
    /// Info was unavailable; the cached record was carried forward.
    Kept(FinalRecord),
    /// Info was unavailable and nothing was cached.
    Skipped { mod_id: ModId, reason: String },
    /// The mod is excluded from the curated list.
    Removed { mod_id: ModId, reason: RemovalReason },
}

impl FetchOutcome {
    pub fn into_record(self) -> Option<FinalRecord> {
        match self {
            FetchOutcome::Fetched(record)
            | FetchOutcome::FalseAlarm(record)
            | FetchOutcome::Kept(record) => Some(record),
            FetchOutcome::Skipped { .. } | FetchOutcome::Removed { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited while fetching mod {mod_id} ({attempts} attempt(s))")]
    RateLimited { mod_id: ModId, attempts: u32 },
}

/// A run-ending fetch failure together with the outcomes of every group that
/// completed before it.
#[derive(Debug)]
pub struct FetchAbort {
    pub error: FetchError,
    pub completed: Vec<FetchOutcome>,
}

/// Runs every planned fetch, group by group.
pub async fn fetch_all<C>(
    catalog: &C,
    items: &[FetchItem],
    snapshot: &Snapshot,
    config: &FetchConfig,
) -> Result<Vec<FetchOutcome>, FetchAbort>
where
    C: CatalogApi + ?Sized,
{
    let batch_size = config.batch_size.max(1);
    let pause = config.batch_pause();
    let groups = items.chunks(batch_size).len();
    let mut outcomes = Vec::with_capacity(items.len());

    for (index, group) in items.chunks(batch_size).enumerate() {
        info!(
            batch = index + 1,
            of = groups,
            size = group.len(),
            "[FETCH] Starting batch"
        );

        let tasks = group.iter().map(|item| {
            fetch_one(
                catalog,
                item,
                snapshot.get(item.entry.id),
                &config.on_rate_limit,
            )
        });

        match try_join_all(tasks).await {
            Ok(batch) => outcomes.extend(batch),
            Err(e) => {
                error!(error = %e, batch = index + 1, "[FETCH][ERROR] Aborting run");
                return Err(FetchAbort {
                    error: e,
                    completed: outcomes,
                });
            }
        }

        if index + 1 < groups && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    Ok(outcomes)
}

async fn fetch_one<C>(
    catalog: &C,
    item: &FetchItem,
    cached: Option<&CachedRecord>,
    policy: &RateLimitPolicy,
) -> Result<FetchOutcome, FetchError>
where
    C: CatalogApi + ?Sized,
{
    let mod_id = item.entry.id;
    let overlay = Some(&item.entry);

    let mut attempt: u32 = 0;
    let info = loop {
        match catalog.mod_info(mod_id).await {
            InfoOutcome::Found(info) => break info,
            InfoOutcome::Missing { status } => {
                info!(mod_id = %mod_id, ?status, "[FETCH] Mod no longer served by catalog");
                return Ok(FetchOutcome::Removed {
                    mod_id,
                    reason: RemovalReason::Missing { status },
                });
            }
            InfoOutcome::Unavailable { reason } => {
                return Ok(match cached {
                    Some(cached) => {
                        warn!(mod_id = %mod_id, %reason, "[FETCH] Info unavailable, keeping cached record");
                        FetchOutcome::Kept(merge::finalize(cached, overlay))
                    }
                    None => {
                        warn!(mod_id = %mod_id, %reason, "[FETCH] Info unavailable and nothing cached, skipping");
                        FetchOutcome::Skipped { mod_id, reason }
                    }
                });
            }
            InfoOutcome::RateLimited { retry_after } => {
                let Some(delay) = policy.retry_delay(attempt, retry_after) else {
                    return Err(FetchError::RateLimited {
                        mod_id,
                        attempts: attempt + 1,
                    });
                };
                warn!(
                    mod_id = %mod_id,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "[FETCH] Rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    };

    if let Some(reason) = removal_reason(&info) {
        info!(mod_id = %mod_id, ?reason, "[FETCH] Mod removed");
        return Ok(FetchOutcome::Removed { mod_id, reason });
    }

    if let Some((files, changelogs)) = cached.and_then(|c| unchanged_collections(c, &info)) {
        info!(mod_id = %mod_id, "[FETCH] False alarm, reusing cached files and changelogs");
        return Ok(FetchOutcome::FalseAlarm(merge::from_remote(
            mod_id, info, files, changelogs, overlay,
        )));
    }

    let files = match catalog.mod_files(mod_id).await {
        Ok(files) => files,
        Err(e) => {
            warn!(mod_id = %mod_id, error = %e, "[FETCH] File list unavailable, writing empty list");
            Vec::new()
        }
    };
    let changelogs = match catalog.mod_changelogs(mod_id).await {
        Ok(changelogs) => changelogs,
        Err(e) => {
            warn!(mod_id = %mod_id, error = %e, "[FETCH] Changelogs unavailable, writing empty map");
            Changelogs::new()
        }
    };

    info!(
        mod_id = %mod_id,
        reason = ?item.reason,
        files = files.len(),
        changelog_versions = changelogs.len(),
        "[FETCH] Mod fetched"
    );
    Ok(FetchOutcome::Fetched(merge::from_remote(
        mod_id, info, files, changelogs, overlay,
    )))
}

fn removal_reason(info: &RemoteInfo) -> Option<RemovalReason> {
    if info.is_publishable() {
        return None;
    }
    let named = info.name.as_deref().is_some_and(|n| !n.trim().is_empty());
    Some(if named {
        RemovalReason::NotPublished {
            status: info.status.clone(),
        }
    } else {
        RemovalReason::Unnamed
    })
}

/// Files and changelogs to reuse when the info timestamp shows nothing changed.
fn unchanged_collections(
    cached: &CachedRecord,
    info: &RemoteInfo,
) -> Option<(Vec<FileRecord>, Changelogs)> {
    if cached.updated_timestamp != info.updated_timestamp {
        return None;
    }
    match (&cached.files, &cached.changelogs) {
        (Some(files), Some(changelogs)) if !files.is_empty() && !changelogs.is_empty() => {
            Some((files.clone(), changelogs.clone()))
        }
        _ => None,
    }
}
