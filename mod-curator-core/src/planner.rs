//! Decides, per tracked mod, whether the cached record can be carried forward
//! or the catalog must be asked again.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::merge;
use crate::model::{Collection, FinalRecord, ModId, TrackedEntry};
use crate::snapshot::Snapshot;

/// Why a mod has to be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanReason {
    /// Nothing cached for this id.
    New,
    /// The change signal lists the id.
    Updated,
    /// The cached record is missing its files or changelogs.
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchItem {
    pub entry: TrackedEntry,
    pub reason: PlanReason,
}

#[derive(Debug, Clone, Default)]
pub struct WorkPlan {
    /// Records carried forward without any catalog call.
    pub reuse: Vec<FinalRecord>,
    /// Mods to refetch, in ascending id order.
    pub fetch: Vec<FetchItem>,
}

fn needs_repair(state: Collection, repair_empty: bool) -> bool {
    match state {
        Collection::Absent => true,
        Collection::Empty => repair_empty,
        Collection::Populated => false,
    }
}

/// Classifies every tracked entry. Duplicate ids collapse, last entry wins.
pub fn plan(
    entries: &[TrackedEntry],
    snapshot: &Snapshot,
    changed: &BTreeSet<ModId>,
    repair_empty: bool,
) -> WorkPlan {
    let unique: BTreeMap<ModId, &TrackedEntry> =
        entries.iter().map(|entry| (entry.id, entry)).collect();

    let mut work = WorkPlan::default();
    for (id, entry) in unique {
        let reason = match snapshot.get(id) {
            None => Some(PlanReason::New),
            Some(_) if changed.contains(&id) => Some(PlanReason::Updated),
            Some(cached)
                if needs_repair(cached.files_state(), repair_empty)
                    || needs_repair(cached.changelogs_state(), repair_empty) =>
            {
                Some(PlanReason::Incomplete)
            }
            Some(cached) => {
                work.reuse.push(merge::finalize(cached, Some(entry)));
                None
            }
        };

        if let Some(reason) = reason {
            debug!(mod_id = %id, ?reason, "[PLAN] Scheduling fetch");
            work.fetch.push(FetchItem {
                entry: entry.clone(),
                reason,
            });
        }
    }

    info!(
        reuse = work.reuse.len(),
        fetch = work.fetch.len(),
        "[PLAN] Work planned"
    );
    work
}
