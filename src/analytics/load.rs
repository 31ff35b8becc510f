//! Rolling substance load
//!
//! Averages dose totals over the most recent window of entries. Windows are
//! slices of the newest-first entry list, not calendar ranges.

use crate::analytics::{round_half_up, window, CURRENT_WINDOW};
use crate::catalog;
use crate::storage::DailyLogEntry;
use serde::Serialize;

/// Per-entry average intake of one substance across a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstanceLoad {
    pub substance_id: String,
    /// Catalog short name, or the raw id for unknown substances
    pub label: String,
    pub unit: String,
    /// Sum of valid doses in the window
    pub total: f64,
    /// `total` divided by the number of entries in the window
    pub average: f64,
}

impl SubstanceLoad {
    /// Average rounded half-up to one decimal, as shown on the dashboard
    pub fn display_average(&self) -> f64 {
        round_half_up(self.average, 1)
    }
}

/// Loads for every substance seen in the first 7 entries, highest first
pub fn rolling_load(entries: &[DailyLogEntry]) -> Vec<SubstanceLoad> {
    window_load(window(entries, 0, CURRENT_WINDOW))
}

/// Loads for every substance seen in `entries`, highest average first.
///
/// Substances keep first-appearance order when averages tie.
pub fn window_load(entries: &[DailyLogEntry]) -> Vec<SubstanceLoad> {
    let mut totals: Vec<(&str, f64)> = Vec::new();

    for med in entries.iter().flat_map(|e| &e.medications) {
        let amount = if med.is_countable() { med.amount } else { 0.0 };
        match totals.iter_mut().find(|(id, _)| *id == med.substance_id) {
            Some((_, total)) => *total += amount,
            None => totals.push((med.substance_id.as_str(), amount)),
        }
    }

    let count = entries.len().max(1) as f64;
    let mut loads: Vec<SubstanceLoad> = totals
        .into_iter()
        .map(|(id, total)| SubstanceLoad {
            substance_id: id.to_string(),
            label: catalog::label_for(id),
            unit: catalog::unit_for(id).to_string(),
            total,
            average: total / count,
        })
        .collect();

    loads.sort_by(|a, b| b.average.total_cmp(&a.average));
    loads
}

/// Top average in the rolling window; 0 when nothing was taken
pub fn primary_load(entries: &[DailyLogEntry]) -> f64 {
    rolling_load(entries)
        .first()
        .map(|l| l.average)
        .unwrap_or(0.0)
}
