//! CSV Export
//!
//! Serializes the log collection into a flat table for spreadsheets and
//! backups. One header row, then one row per entry in collection order
//! (newest first). Quoting follows standard CSV rules.

use crate::storage::{DailyLogEntry, TakenMedicationEntry};
use chrono::NaiveDate;
use std::io::Write;
use thiserror::Error;

/// Column header row, in output order
pub const CSV_HEADER: [&str; 6] = ["Date", "Alcohol", "AlcoholUnits", "Medications", "Mood", "Notes"];

/// Errors that can occur while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Conventional export file name, e.g. `soberstats-export-2024-06-30.csv`
pub fn export_filename(app_name: &str, date: NaiveDate) -> String {
    format!("{}-export-{}.csv", app_name, date.format("%Y-%m-%d"))
}

/// Write entries as CSV to any writer
pub fn write_csv<W: Write>(entries: &[DailyLogEntry], writer: W) -> ExportResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for entry in entries {
        csv.write_record(entry_record(entry))?;
    }

    csv.flush()?;
    Ok(())
}

/// Encode entries as a CSV string
pub fn encode_csv(entries: &[DailyLogEntry]) -> ExportResult<String> {
    let mut buffer = Vec::new();
    write_csv(entries, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn entry_record(entry: &DailyLogEntry) -> [String; 6] {
    [
        entry.date.format("%Y-%m-%d").to_string(),
        if entry.alcohol_consumed { "Yes" } else { "No" }.to_string(),
        entry.alcohol_units.to_string(),
        flatten_medications(&entry.medications),
        entry.mood.map(|m| m.to_string()).unwrap_or_default(),
        entry.notes.clone().unwrap_or_default(),
    ]
}

/// `id:amount` pairs joined with `; `, custom names in brackets
pub fn flatten_medications(medications: &[TakenMedicationEntry]) -> String {
    medications
        .iter()
        .map(|m| match (m.is_other(), m.custom_name.as_deref()) {
            (true, Some(name)) => format!("{}[{}]:{}", m.substance_id, name, m.amount),
            _ => format!("{}:{}", m.substance_id, m.amount),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
