//! Core data types for the journal
//!
//! This module defines the records persisted by the log repository:
//! - `TakenMedicationEntry`: one dose inside a day's log
//! - `DailyLogEntry`: everything recorded for one calendar date
//! - `UserSettings`: the singleton settings object
//!
//! Field names serialize in camelCase so stores written by earlier
//! versions of the journal stay readable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Substance id reserved for free-form, uncatalogued substances
pub const OTHER_SUBSTANCE_ID: &str = "other";

/// A single dose recorded within a daily log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TakenMedicationEntry {
    /// Catalog id of the substance (or `"other"`)
    #[serde(rename = "medicationId")]
    pub substance_id: String,
    /// Dose, in the unit of the referenced substance
    pub amount: f64,
    /// Name typed by the user when `substance_id` is `"other"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    /// Context for taking the dose
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TakenMedicationEntry {
    /// Create a dose of a catalogued substance
    pub fn new(substance_id: impl Into<String>, amount: f64) -> Self {
        Self {
            substance_id: substance_id.into(),
            amount,
            custom_name: None,
            reason: None,
        }
    }

    /// Create a dose of an uncatalogued substance.
    ///
    /// A blank name falls back to `"Other"`.
    pub fn other(name: &str, amount: f64) -> Self {
        let name = name.trim();
        Self {
            substance_id: OTHER_SUBSTANCE_ID.to_string(),
            amount,
            custom_name: Some(if name.is_empty() {
                "Other".to_string()
            } else {
                name.to_string()
            }),
            reason: None,
        }
    }

    /// Builder: attach a reason (blank text is dropped)
    pub fn reason(mut self, reason: &str) -> Self {
        let reason = reason.trim();
        self.reason = if reason.is_empty() {
            None
        } else {
            Some(reason.to_string())
        };
        self
    }

    /// Whether this dose should contribute to aggregate sums
    pub fn is_countable(&self) -> bool {
        self.amount.is_finite() && self.amount > 0.0
    }

    pub fn is_other(&self) -> bool {
        self.substance_id == OTHER_SUBSTANCE_ID
    }
}

/// Everything recorded for one calendar date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogEntry {
    /// Stable identifier, assigned once at creation
    pub id: String,
    /// Calendar date this entry describes
    pub date: NaiveDate,
    pub alcohol_consumed: bool,
    /// Units of alcohol; always 0 when `alcohol_consumed` is false
    #[serde(default)]
    pub alcohol_units: f64,
    /// Doses in the order they were entered
    #[serde(default)]
    pub medications: Vec<TakenMedicationEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Mood on a 1-10 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<u8>,
    /// Unix timestamp in milliseconds for midnight UTC of `date`
    #[serde(default)]
    pub timestamp: i64,
}

impl DailyLogEntry {
    /// Create an entry for `date` with a freshly generated id
    pub fn new(date: NaiveDate) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), date)
    }

    /// Create an entry reusing an existing id (editing a date's entry)
    pub fn with_id(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            alcohol_consumed: false,
            alcohol_units: 0.0,
            medications: Vec::new(),
            notes: None,
            mood: None,
            timestamp: date_timestamp_millis(date),
        }
    }

    /// Builder: record alcohol intake.
    ///
    /// Units are stored as 0 when `consumed` is false.
    pub fn alcohol(mut self, consumed: bool, units: f64) -> Self {
        self.alcohol_consumed = consumed;
        self.alcohol_units = if consumed { units } else { 0.0 };
        self
    }

    /// Builder: append a dose
    pub fn medication(mut self, medication: TakenMedicationEntry) -> Self {
        self.medications.push(medication);
        self
    }

    /// Builder: set notes (blank text is dropped)
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes.to_string())
        };
        self
    }

    /// Builder: set mood, clamped to 1-10
    pub fn mood(mut self, mood: u8) -> Self {
        self.mood = Some(mood.clamp(1, 10));
        self
    }

    /// Enforce the builder invariants on an entry built field-by-field.
    ///
    /// Applied by the repository before every write.
    ///
    /// Non-finite or negative quantities become 0: JSON has no encoding for
    /// NaN or infinity, and a stored `null` would make the collection unreadable.
    pub fn normalized(mut self) -> Self {
        if !self.alcohol_consumed || !is_valid_quantity(self.alcohol_units) {
            self.alcohol_units = 0.0;
        }
        for med in &mut self.medications {
            if !is_valid_quantity(med.amount) {
                med.amount = 0.0;
            }
        }
        self.mood = self.mood.map(|m| m.clamp(1, 10));
        self
    }

    /// Alcohol units usable in sums
    pub fn countable_alcohol_units(&self) -> f64 {
        if self.alcohol_consumed && self.alcohol_units.is_finite() && self.alcohol_units > 0.0 {
            self.alcohol_units
        } else {
            0.0
        }
    }

    /// Amount of the first countable dose of a substance, 0 if none.
    ///
    /// Later doses of the same substance in this entry are not added.
    pub fn first_dose(&self, substance_id: &str) -> f64 {
        self.medications
            .iter()
            .find(|m| m.substance_id == substance_id && m.is_countable())
            .map(|m| m.amount)
            .unwrap_or(0.0)
    }
}

/// Finite and not negative
pub fn is_valid_quantity(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Milliseconds since the epoch for midnight UTC of `date`
pub fn date_timestamp_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// User settings, replaced wholesale on every save
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Display label
    #[serde(default = "default_name")]
    pub name: String,
    /// Read-only mode for family members viewing the journal
    #[serde(default)]
    pub family_mode: bool,
    /// Lock-screen secret; presence alone enables the lock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Presentation theme key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

fn default_name() -> String {
    "User".to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            family_mode: false,
            password: None,
            theme: None,
        }
    }
}

impl UserSettings {
    pub fn is_locked(&self) -> bool {
        self.password.is_some()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_family_mode(mut self, enabled: bool) -> Self {
        self.family_mode = enabled;
        self
    }

    pub fn toggle_family_mode(self) -> Self {
        let enabled = !self.family_mode;
        self.with_family_mode(enabled)
    }

    /// Set the lock password; blank input leaves settings unchanged
    pub fn with_password(mut self, password: &str) -> Self {
        if !password.trim().is_empty() {
            self.password = Some(password.to_string());
        }
        self
    }

    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}
