//! Dashboard summary
//!
//! Streaks, today's log status and the headline load figure, computed in one
//! pass over a snapshot of the log collection.

use crate::analytics::load::{rolling_load, SubstanceLoad};
use crate::storage::DailyLogEntry;
use chrono::NaiveDate;
use serde::Serialize;

/// Whether today's entry has been recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogStatus {
    Complete,
    Pending,
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogStatus::Complete => write!(f, "COMPLETE"),
            LogStatus::Pending => write!(f, "PENDING"),
        }
    }
}

/// Headline figures for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub status: LogStatus,
    /// Consecutive most-recent alcohol-free entries
    pub sober_streak: usize,
    /// Highest rolling average, if anything was taken in the window
    pub top_load: Option<SubstanceLoad>,
    pub total_entries: usize,
}

impl DashboardSummary {
    /// Top rolling average, 0 when the window is empty
    pub fn primary_load(&self) -> f64 {
        self.top_load.as_ref().map(|l| l.average).unwrap_or(0.0)
    }
}

/// Count leading entries matching `predicate`, stopping at the first miss
pub fn leading_streak<F>(entries: &[DailyLogEntry], predicate: F) -> usize
where
    F: Fn(&DailyLogEntry) -> bool,
{
    entries.iter().take_while(|e| predicate(e)).count()
}

/// Consecutive most-recent entries without alcohol.
///
/// Entries must be newest first. Calendar gaps are not considered.
pub fn sober_streak(entries: &[DailyLogEntry]) -> usize {
    leading_streak(entries, |e| !e.alcohol_consumed)
}

/// Whether any entry is dated `today`
pub fn logged_on(entries: &[DailyLogEntry], today: NaiveDate) -> bool {
    entries.iter().any(|e| e.date == today)
}

/// Whether any entry is dated with the current local calendar date
pub fn logged_today(entries: &[DailyLogEntry]) -> bool {
    logged_on(entries, chrono::Local::now().date_naive())
}

/// Build the dashboard summary as of `today`
pub fn dashboard_summary(entries: &[DailyLogEntry], today: NaiveDate) -> DashboardSummary {
    DashboardSummary {
        status: if logged_on(entries, today) {
            LogStatus::Complete
        } else {
            LogStatus::Pending
        },
        sober_streak: sober_streak(entries),
        top_load: rolling_load(entries).into_iter().next(),
        total_entries: entries.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TakenMedicationEntry;
    use chrono::{Duration, Local};

    fn history(alcohol: &[bool], start: NaiveDate) -> Vec<DailyLogEntry> {
        alcohol
            .iter()
            .enumerate()
            .map(|(i, &drank)| DailyLogEntry::new(start - Duration::days(i as i64)).alcohol(drank, 2.0))
            .collect()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_streak_stops_at_first_drink() {
        let entries = history(&[false, false, true, false], day("2024-06-30"));
        assert_eq!(sober_streak(&entries), 2);
    }

    #[test]
    fn test_streak_edges() {
        assert_eq!(sober_streak(&[]), 0);
        assert_eq!(sober_streak(&history(&[true, false], day("2024-06-30"))), 0);
        assert_eq!(sober_streak(&history(&[false; 5], day("2024-06-30"))), 5);
    }

    #[test]
    fn test_logged_today_local_date() {
        let today = Local::now().date_naive();

        assert!(logged_today(&[DailyLogEntry::new(today)]));
        assert!(!logged_today(&[DailyLogEntry::new(today - Duration::days(1))]));
    }

    #[test]
    fn test_dashboard_summary() {
        let today = day("2024-06-30");
        let mut entries = history(&[false, false, true], today);
        entries[0] = entries[0]
            .clone()
            .medication(TakenMedicationEntry::new("alprazolam", 1.5));

        let summary = dashboard_summary(&entries, today);
        assert_eq!(summary.status, LogStatus::Complete);
        assert_eq!(summary.sober_streak, 2);
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.primary_load(), 0.5);
        assert_eq!(summary.top_load.unwrap().label, "Alprazolam");
    }

    #[test]
    fn test_dashboard_summary_empty() {
        let summary = dashboard_summary(&[], day("2024-06-30"));
        assert_eq!(summary.status, LogStatus::Pending);
        assert_eq!(summary.sober_streak, 0);
        assert_eq!(summary.primary_load(), 0.0);
        assert!(summary.top_load.is_none());
    }
}
