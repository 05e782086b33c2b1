use std::fmt::Write;

use crate::fetch::FetchOutcome;
use crate::model::ModId;
use crate::output::WriteOutcome;

/// Summary of one run.
///
/// `removed` holds only mods explicitly excluded during fetch; ids dropped while
/// loading the tracked list are counted separately in `rejected_at_input`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Unique usable ids in the tracked list.
    pub tracked: usize,
    pub rejected_at_input: Vec<String>,
    pub reused: usize,
    pub fetched: usize,
    pub false_alarms: usize,
    pub kept_stale: usize,
    pub skipped: Vec<ModId>,
    pub removed: Vec<ModId>,
    /// Records in the rendered curated list.
    pub written: usize,
    pub write: Option<WriteOutcome>,
}

impl SyncReport {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Fetched(_) => self.fetched += 1,
            FetchOutcome::FalseAlarm(_) => self.false_alarms += 1,
            FetchOutcome::Kept(_) => self.kept_stale += 1,
            FetchOutcome::Skipped { mod_id, .. } => self.skipped.push(*mod_id),
            FetchOutcome::Removed { mod_id, .. } => self.removed.push(*mod_id),
        }
    }

    /// Console summary for the operator.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let write = match self.write {
            Some(WriteOutcome::Written) => "written",
            Some(WriteOutcome::Unchanged) => "unchanged",
            Some(WriteOutcome::DryRun) => "dry run (not written)",
            None => "not written",
        };

        let _ = writeln!(out, "Tracked:        {}", self.tracked);
        let _ = writeln!(out, "Valid:          {}", self.written);
        let _ = writeln!(out, "Removed:        {}", self.removed.len());
        let _ = writeln!(out, "Reused:         {}", self.reused);
        let _ = writeln!(out, "Fetched:        {}", self.fetched);
        let _ = writeln!(out, "False alarms:   {}", self.false_alarms);
        if self.kept_stale > 0 {
            let _ = writeln!(out, "Kept (stale):   {}", self.kept_stale);
        }
        if !self.skipped.is_empty() {
            let _ = writeln!(out, "Skipped:        {}", join_ids(&self.skipped));
        }
        if !self.rejected_at_input.is_empty() {
            let raw = self
                .rejected_at_input
                .iter()
                .map(|id| format!("{id:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "Invalid input:  {} ({raw})",
                self.rejected_at_input.len()
            );
        }
        let _ = writeln!(out, "Curated list:   {write}");
        if !self.removed.is_empty() {
            let _ = writeln!(out, "Remove from tracked list: {}", join_ids(&self.removed));
        }
        out
    }
}

fn join_ids(ids: &[ModId]) -> String {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted
        .iter()
        .map(ModId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_removed_ids_in_order() {
        let report = SyncReport {
            tracked: 4,
            removed: vec![ModId(30), ModId(2)],
            written: 2,
            write: Some(WriteOutcome::Written),
            ..Default::default()
        };
        let summary = report.render_summary();
        assert!(summary.contains("Tracked:        4"));
        assert!(summary.contains("Removed:        2"));
        assert!(summary.contains("Remove from tracked list: 2, 30"));
        assert!(summary.contains("Curated list:   written"));
    }

    #[test]
    fn removal_count_comes_from_fetch_outcomes_only() {
        let mut report = SyncReport {
            rejected_at_input: vec![String::new()],
            ..Default::default()
        };
        report.record(&FetchOutcome::Removed {
            mod_id: ModId(9),
            reason: crate::fetch::RemovalReason::Unnamed,
        });
        assert_eq!(report.removed, vec![ModId(9)]);
        assert_eq!(report.rejected_at_input.len(), 1);
    }

    #[test]
    fn summary_names_rejected_input_rows() {
        let report = SyncReport {
            rejected_at_input: vec!["abc".to_string(), String::new(), "-5".to_string()],
            ..Default::default()
        };
        let summary = report.render_summary();
        assert!(summary.contains(r#"Invalid input:  3 ("abc", "", "-5")"#));
    }
}
