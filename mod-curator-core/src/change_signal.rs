use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::config::UpdatedPeriod;
use crate::contract::CatalogApi;
use crate::model::ModId;

/// Ids the catalog reports as changed within `period`.
///
/// Any failure degrades to an empty set; the planner's completeness check still
/// catches records that were never fully written.
pub async fn fetch_change_signal<C>(catalog: &C, period: UpdatedPeriod) -> BTreeSet<ModId>
where
    C: CatalogApi + ?Sized,
{
    match catalog.updated_mods(period.as_str()).await {
        Ok(ids) => {
            let changed: BTreeSet<ModId> = ids.into_iter().collect();
            info!(period = period.as_str(), changed = changed.len(), "[SYNC] Fetched change signal");
            changed
        }
        Err(e) => {
            warn!(period = period.as_str(), error = %e, "[SYNC] Change signal unavailable, assuming nothing changed");
            BTreeSet::new()
        }
    }
}
