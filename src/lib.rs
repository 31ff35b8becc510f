//! # SoberStats
//!
//! Personal recovery journal - daily logs of benzodiazepine doses, alcohol
//! and mood, with taper analytics and a narrative insight.
//!
//! ## Features
//!
//! - **Durable local storage**: the whole collection lives under one key
//! - **Taper analytics**: rolling substance load, week-over-week trends, sober streak
//! - **Insights**: hosted model or offline rule-based summary, fetched once per session
//! - **Export**: CSV suitable for spreadsheets and backups
//!
//! ## Modules
//!
//! - [`storage`]: Log entries, settings and the repository over a key-value store
//! - [`catalog`]: Static reference data for tracked substances
//! - [`analytics`]: Pure derivations over the log collection
//! - [`insight`]: Narrative insight generators and session cache
//! - [`export`]: CSV encoder
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use soberstats::analytics::{rolling_load, sober_streak};
//! use soberstats::storage::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LogRepository::new(FileStore::open("./soberstats_data")?);
//!
//!     let today = chrono::Local::now().date_naive();
//!     repo.upsert(
//!         DailyLogEntry::new(today)
//!             .medication(TakenMedicationEntry::new("diazepam", 10.0))
//!             .mood(6),
//!     )?;
//!
//!     let logs = repo.list()?;
//!     println!("Sober streak: {}", sober_streak(&logs));
//!     for load in rolling_load(&logs) {
//!         println!("{}: {}{} per entry", load.label, load.display_average(), load.unit);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod export;
pub mod insight;
pub mod logging;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    DailyLogEntry, FileStore, KeyValueStore, LogRepository, MemoryStore, StorageError,
    StorageResult, TakenMedicationEntry, UserSettings,
};

pub use analytics::{
    dashboard_summary, rolling_load, sober_streak, substance_trends, DashboardSummary,
    SubstanceLoad, SubstanceTrend, TrendDirection,
};

pub use insight::{
    fetch_insight, InsightError, InsightGenerator, InsightSession, RemoteInsightClient,
    RuleBasedInsight, INSIGHT_PLACEHOLDER,
};

pub use export::{encode_csv, write_csv, ExportError};

pub use config::{Config, ConfigError, InsightConfig, LoggingConfig};
