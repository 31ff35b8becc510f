//! Analytics Engine
//!
//! Pure computations over a snapshot of the log collection. Every function
//! takes entries newest first (as returned by the repository) and never
//! mutates them.
//!
//! - **summary**: sober streak, today's status, dashboard figures
//! - **load**: rolling 7-entry substance load
//! - **trends**: current vs previous window per catalog substance
//!
//! Windows are positional slices of the entry list, not calendar ranges:
//!
//! ```text
//! entries:  [0 1 2 3 4 5 6 | 7 8 9 10 11 12 13 | 14 ...]
//!            current window  previous window
//! ```
//!
//! Averages are kept exact; rounding happens only in the `display_*` helpers.

pub mod load;
pub mod summary;
pub mod trends;

pub use load::{primary_load, rolling_load, window_load, SubstanceLoad};
pub use summary::{
    dashboard_summary, leading_streak, logged_on, logged_today, sober_streak, DashboardSummary,
    LogStatus,
};
pub use trends::{
    substance_trends, trends_for, window_average, SubstanceTrend, TrendDirection, TREND_THRESHOLD,
};

use crate::storage::DailyLogEntry;

/// Number of entries per comparison window
pub const CURRENT_WINDOW: usize = 7;

/// Up to `len` entries starting at `start`, clamped to the slice
pub fn window(entries: &[DailyLogEntry], start: usize, len: usize) -> &[DailyLogEntry] {
    let start = start.min(entries.len());
    let end = start.saturating_add(len).min(entries.len());
    &entries[start..end]
}

/// Round half away from zero to `places` decimals
pub fn round_half_up(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Mean mood over entries that recorded one
pub fn average_mood(entries: &[DailyLogEntry]) -> Option<f64> {
    let moods: Vec<f64> = entries.iter().filter_map(|e| e.mood).map(f64::from).collect();
    if moods.is_empty() {
        None
    } else {
        Some(moods.iter().sum::<f64>() / moods.len() as f64)
    }
}

/// Total countable alcohol units over entries
pub fn total_alcohol_units(entries: &[DailyLogEntry]) -> f64 {
    entries.iter().map(|e| e.countable_alcohol_units()).sum()
}
