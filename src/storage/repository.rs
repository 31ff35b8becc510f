//! Log repository
//!
//! Owns the canonical collection of daily log entries and the user settings.
//! Every mutation reads the full snapshot, computes the new snapshot and
//! writes it back under a single key:
//!
//! ```text
//! upsert/remove:  get(LOGS_KEY) → parse → modify → sort desc by date → set(LOGS_KEY)
//! list:           get(LOGS_KEY) → parse (garbage → empty)
//! ```
//!
//! The collection is always stored newest-first; analytics rely on this.

use crate::storage::error::StorageResult;
use crate::storage::kv::KeyValueStore;
use crate::storage::types::{DailyLogEntry, TakenMedicationEntry, UserSettings};
use chrono::{Duration, NaiveDate};

/// Storage key for the log collection
pub const LOGS_KEY: &str = "soberstats_logs";

/// Storage key for the settings object
pub const SETTINGS_KEY: &str = "soberstats_settings";

/// Number of days of demo history written by [`LogRepository::seed_demo_data`]
const DEMO_DAYS: i64 = 30;

/// Repository over a key-value backing store
pub struct LogRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> LogRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All entries, newest first
    pub fn list(&self) -> StorageResult<Vec<DailyLogEntry>> {
        let Some(raw) = self.store.get(LOGS_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<DailyLogEntry>>(&raw) {
            Ok(mut entries) => {
                sort_newest_first(&mut entries);
                Ok(entries)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored log collection is unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Insert or replace an entry by id, returning the new collection
    pub fn upsert(&self, entry: DailyLogEntry) -> StorageResult<Vec<DailyLogEntry>> {
        let entry = entry.normalized();
        let mut entries = self.list()?;

        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => {
                tracing::debug!(id = %entry.id, date = %entry.date, "Replacing log entry");
                *existing = entry;
            }
            None => {
                tracing::debug!(id = %entry.id, date = %entry.date, "Adding log entry");
                entries.push(entry);
            }
        }

        sort_newest_first(&mut entries);
        self.write_logs(&entries)?;
        Ok(entries)
    }

    /// Remove an entry by id; a missing id is a no-op
    pub fn remove(&self, id: &str) -> StorageResult<Vec<DailyLogEntry>> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == before {
            tracing::debug!(id = %id, "No log entry to remove");
        }

        self.write_logs(&entries)?;
        Ok(entries)
    }

    /// Wipe all persisted journal data
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(LOGS_KEY)?;
        self.store.remove(SETTINGS_KEY)?;
        tracing::info!("Cleared all journal data");
        Ok(())
    }

    /// The first entry recorded for `date`, if any
    pub fn find_by_date(&self, date: NaiveDate) -> StorageResult<Option<DailyLogEntry>> {
        Ok(self.list()?.into_iter().find(|e| e.date == date))
    }

    /// Current settings; missing or unreadable settings yield defaults
    pub fn settings(&self) -> StorageResult<UserSettings> {
        let Some(raw) = self.store.get(SETTINGS_KEY)? else {
            return Ok(UserSettings::default());
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored settings are unreadable, using defaults");
            UserSettings::default()
        }))
    }

    /// Replace the settings object
    pub fn save_settings(&self, settings: &UserSettings) -> StorageResult<()> {
        let content = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &content)
    }

    /// Populate an empty journal with demo history ending at `today`.
    ///
    /// Returns the number of entries written; 0 when data already exists.
    pub fn seed_demo_data(&self, today: NaiveDate) -> StorageResult<usize> {
        if !self.list()?.is_empty() {
            return Ok(0);
        }

        let entries: Vec<DailyLogEntry> = (0..DEMO_DAYS)
            .map(|i| demo_entry(today - Duration::days(i), i))
            .collect();

        self.write_logs(&entries)?;
        tracing::info!(entries = entries.len(), "Seeded demo data");
        Ok(entries.len())
    }

    fn write_logs(&self, entries: &[DailyLogEntry]) -> StorageResult<()> {
        let content = serde_json::to_string(entries)?;
        self.store.set(LOGS_KEY, &content)
    }
}

/// Stable sort by date, newest first
fn sort_newest_first(entries: &mut [DailyLogEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Demo history: drinking stopped 10 days ago, diazepam tapered 20 days ago
fn demo_entry(date: NaiveDate, days_ago: i64) -> DailyLogEntry {
    let drank = days_ago > 10;
    let dose = if days_ago > 20 { 15.0 } else { 10.0 };
    let mood = 3 + (days_ago * 7 % 6) as u8;

    let entry = DailyLogEntry::new(date)
        .alcohol(drank, (2 + days_ago % 5) as f64)
        .medication(TakenMedicationEntry::new("diazepam", dose))
        .mood(mood);

    if days_ago == 0 {
        entry.notes("Feeling okay today.")
    } else {
        entry
    }
}
