//! Journal Storage
//!
//! This module provides persistence for the journal:
//!
//! - **types**: Core records (DailyLogEntry, TakenMedicationEntry, UserSettings)
//! - **kv**: Key-value backing stores (in-memory and file-backed)
//! - **repository**: Upsert/remove/list over the log collection and settings
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   DailyLogEntry → normalize → merge by id → sort desc by date → JSON → KeyValueStore
//!
//! Read Path:
//!   KeyValueStore → JSON (unreadable → empty) → Vec<DailyLogEntry>, newest first
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use soberstats::storage::{DailyLogEntry, FileStore, LogRepository, TakenMedicationEntry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LogRepository::new(FileStore::open("./soberstats_data")?);
//!
//!     let today = chrono::Local::now().date_naive();
//!     let entry = match repo.find_by_date(today)? {
//!         Some(existing) => existing,
//!         None => DailyLogEntry::new(today),
//!     }
//!     .medication(TakenMedicationEntry::new("diazepam", 5.0))
//!     .mood(6);
//!
//!     let entries = repo.upsert(entry)?;
//!     println!("{} entries recorded", entries.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kv;
pub mod repository;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repository::{LogRepository, LOGS_KEY, SETTINGS_KEY};
pub use types::{
    date_timestamp_millis, is_valid_quantity, DailyLogEntry, TakenMedicationEntry, UserSettings,
    OTHER_SUBSTANCE_ID,
};
