//! Week-over-week trend classification
//!
//! Compares the per-entry average of every catalog substance between the
//! current window (entries 0..7) and the previous window (entries 7..14).

use crate::analytics::{round_half_up, window, CURRENT_WINDOW};
use crate::catalog::{SubstanceReference, CATALOG};
use crate::storage::DailyLogEntry;
use serde::Serialize;

/// Differences within this band count as no change
pub const TREND_THRESHOLD: f64 = 0.05;

/// Direction of change between two windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// Classify `current - previous` using the strict ±0.05 band
    pub fn classify(current: f64, previous: f64) -> Self {
        let delta = current - previous;
        if delta > TREND_THRESHOLD {
            TrendDirection::Up
        } else if delta < -TREND_THRESHOLD {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "UP"),
            TrendDirection::Down => write!(f, "DOWN"),
            TrendDirection::Flat => write!(f, "FLAT"),
        }
    }
}

/// Trend of one substance between the current and previous window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstanceTrend {
    pub substance_id: String,
    pub label: String,
    pub unit: String,
    pub current_average: f64,
    pub previous_average: f64,
    pub direction: TrendDirection,
}

impl SubstanceTrend {
    pub fn delta(&self) -> f64 {
        self.current_average - self.previous_average
    }

    /// Averages rounded half-up to two decimals, for display
    pub fn display_averages(&self) -> (f64, f64) {
        (
            round_half_up(self.current_average, 2),
            round_half_up(self.previous_average, 2),
        )
    }
}

/// Per-entry average of one substance over a window; 0 for an empty window.
///
/// Each entry contributes its first dose of the substance only.
pub fn window_average(entries: &[DailyLogEntry], substance_id: &str) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let total: f64 = entries.iter().map(|e| e.first_dose(substance_id)).sum();
    total / entries.len() as f64
}

/// Trends for catalog substances present in either window
pub fn substance_trends(entries: &[DailyLogEntry]) -> Vec<SubstanceTrend> {
    trends_for(entries, CATALOG)
}

/// Trends for the given substances present in either window
pub fn trends_for(entries: &[DailyLogEntry], substances: &[SubstanceReference]) -> Vec<SubstanceTrend> {
    let current = window(entries, 0, CURRENT_WINDOW);
    let previous = window(entries, CURRENT_WINDOW, CURRENT_WINDOW);

    substances
        .iter()
        .filter_map(|substance| {
            let current_average = window_average(current, substance.id);
            let previous_average = window_average(previous, substance.id);

            if current_average <= 0.0 && previous_average <= 0.0 {
                return None;
            }

            Some(SubstanceTrend {
                substance_id: substance.id.to_string(),
                label: substance.short_name().to_string(),
                unit: substance.unit.to_string(),
                current_average,
                previous_average,
                direction: TrendDirection::classify(current_average, previous_average),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TakenMedicationEntry;
    use chrono::{Duration, NaiveDate};

    /// One entry per day, newest first, each with the given diazepam dose
    fn diazepam_history(doses: &[f64]) -> Vec<DailyLogEntry> {
        let start = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        doses
            .iter()
            .enumerate()
            .map(|(i, &dose)| {
                let entry = DailyLogEntry::new(start - Duration::days(i as i64));
                if dose > 0.0 {
                    entry.medication(TakenMedicationEntry::new("diazepam", dose))
                } else {
                    entry
                }
            })
            .collect()
    }

    #[test]
    fn test_boundary_delta_is_flat() {
        assert_eq!(TrendDirection::classify(5.05, 5.00), TrendDirection::Flat);
        assert_eq!(TrendDirection::classify(5.00, 5.05), TrendDirection::Flat);
        assert_eq!(TrendDirection::classify(5.06, 5.00), TrendDirection::Up);
        assert_eq!(TrendDirection::classify(4.94, 5.00), TrendDirection::Down);
    }

    #[test]
    fn test_taper_is_down() {
        let mut doses = vec![10.0; 7];
        doses.extend(vec![15.0; 7]);

        let trends = substance_trends(&diazepam_history(&doses));
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].substance_id, "diazepam");
        assert_eq!(trends[0].current_average, 10.0);
        assert_eq!(trends[0].previous_average, 15.0);
        assert_eq!(trends[0].direction, TrendDirection::Down);
        assert_eq!(trends[0].delta(), -5.0);
    }

    #[test]
    fn test_substance_absent_in_both_windows_excluded() {
        let trends = substance_trends(&diazepam_history(&[0.0; 14]));
        assert!(trends.is_empty());

        let trends = substance_trends(&diazepam_history(&[5.0; 3]));
        assert!(trends.iter().all(|t| t.substance_id == "diazepam"));
    }

    #[test]
    fn test_empty_previous_window_counts_as_zero() {
        let trends = substance_trends(&diazepam_history(&[2.0, 2.0]));
        assert_eq!(trends[0].previous_average, 0.0);
        assert_eq!(trends[0].direction, TrendDirection::Up);
    }

    #[test]
    fn test_previous_window_only() {
        let mut doses = vec![0.0; 7];
        doses.extend([7.0, 0.0]);

        let trends = substance_trends(&diazepam_history(&doses));
        assert_eq!(trends[0].current_average, 0.0);
        assert_eq!(trends[0].previous_average, 3.5);
        assert_eq!(trends[0].direction, TrendDirection::Down);
    }

    #[test]
    fn test_repeat_dose_in_one_entry_counts_once() {
        let entries = vec![DailyLogEntry::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
            .medication(TakenMedicationEntry::new("diazepam", 5.0))
            .medication(TakenMedicationEntry::new("diazepam", 5.0))];

        let trends = substance_trends(&entries);
        assert_eq!(trends[0].current_average, 5.0);
    }

    #[test]
    fn test_uncatalogued_substances_not_reported() {
        let entries = vec![DailyLogEntry::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
            .medication(TakenMedicationEntry::new("kratom", 3.0))];

        assert!(substance_trends(&entries).is_empty());
    }

    #[test]
    fn test_display_averages_two_decimals() {
        let trends = substance_trends(&diazepam_history(&[1.0, 0.0, 0.0]));
        assert_eq!(trends[0].display_averages(), (0.33, 0.0));
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(TrendDirection::Up.to_string(), "UP");
        assert_eq!(serde_json::to_string(&TrendDirection::Flat).unwrap(), "\"FLAT\"");
    }
}
