//! SoberStats CLI
//!
//! Command-line interface for the recovery journal:
//! - Log and edit daily entries
//! - Dashboard, trends and insight
//! - Settings and family mode
//! - CSV export

use anyhow::{bail, Context};
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use soberstats::analytics::{dashboard_summary, rolling_load, substance_trends};
use soberstats::catalog::CATALOG;
use soberstats::config::{generate_default_config, Config};
use soberstats::export::{export_filename, write_csv};
use soberstats::insight::{
    InsightGenerator, InsightSession, RemoteInsightClient, RuleBasedInsight,
};
use soberstats::logging::init_logging;
use soberstats::storage::{
    is_valid_quantity, DailyLogEntry, FileStore, LogRepository, TakenMedicationEntry,
    UserSettings, OTHER_SUBSTANCE_ID,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "soberstats")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recovery journal for benzodiazepine tapering and sobriety")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record the entry for a date. An existing entry is edited: fields
    /// not given keep their values, and any --dose replaces the day's doses.
    Log {
        /// Date: "today", "yesterday" or YYYY-MM-DD
        #[arg(short, long, default_value = "today")]
        date: String,
        /// Alcohol units consumed
        #[arg(short, long, value_parser = parse_amount, conflicts_with = "sober")]
        alcohol: Option<f64>,
        /// Mark the day alcohol-free
        #[arg(long)]
        sober: bool,
        /// Dose as ID=AMOUNT, or other:NAME=AMOUNT for uncatalogued substances
        #[arg(long = "dose")]
        doses: Vec<String>,
        /// Mood from 1 to 10
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
        mood: Option<u8>,
        /// Free-form notes (empty text clears them)
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete an entry by id
    Delete {
        id: String,
    },

    /// List all entries, newest first
    List,

    /// Today's status, streak, load, trends and insight
    Dashboard,

    /// Week-over-week substance trends
    Trends,

    /// Export the journal as CSV
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or change settings
    Settings {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        theme: Option<String>,
        /// Read-only mode for family members
        #[arg(long, value_enum)]
        family_mode: Option<Switch>,
        /// Set the lock password
        #[arg(long, conflicts_with = "remove_password")]
        password: Option<String>,
        /// Remove the lock password
        #[arg(long)]
        remove_password: bool,
    },

    /// Fill an empty journal with 30 days of demo data
    Seed,

    /// Delete all entries and settings
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },

    /// List known substances
    Catalog,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// Commands that change journal data
    fn mutates_journal(&self) -> bool {
        matches!(
            self,
            Commands::Log { .. }
                | Commands::Delete { .. }
                | Commands::Seed
                | Commands::Clear { .. }
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }

    init_logging(&config.logging);

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let store = FileStore::open(&config.storage.data_dir)
        .with_context(|| format!("cannot open data directory {}", config.storage.data_dir))?;
    let repo = LogRepository::new(store);
    tracing::debug!(data_dir = %config.storage.data_dir, "Opened journal");

    let settings = repo.settings()?;
    if cli.command.mutates_journal() && settings.family_mode {
        bail!("Family mode is on; the journal is read-only. Run `soberstats settings --family-mode off` first.");
    }

    let today = Local::now().date_naive();

    match cli.command {
        Commands::Log {
            date,
            alcohol,
            sober,
            doses,
            mood,
            notes,
        } => {
            let date = parse_date(&date, today)?;
            let doses = doses
                .iter()
                .map(|d| parse_dose(d))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let base = match repo.find_by_date(date)? {
                Some(existing) => existing,
                None => DailyLogEntry::new(date),
            };
            let edit = LogEdit {
                alcohol,
                sober,
                doses,
                mood,
                notes,
            };
            let entry = edit.apply(base);

            let id = entry.id.clone();
            let entries = repo.upsert(entry)?;
            println!("Logged {} ({}); {} entries total", date, id, entries.len());
        }

        Commands::Delete { id } => {
            let before = repo.list()?.len();
            let entries = repo.remove(&id)?;
            if entries.len() == before {
                println!("No entry with id {}", id);
            } else {
                println!("Deleted {}", id);
            }
        }

        Commands::List => {
            let entries = repo.list()?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
                OutputFormat::Table => print_entries(&entries),
            }
        }

        Commands::Dashboard => {
            let entries = repo.list()?;
            let summary = dashboard_summary(&entries, today);
            let trends = substance_trends(&entries);

            let session = InsightSession::new(insight_generator(&config)?);
            session.fetch(&entries).await;
            let insight = session.display_text().await;

            match cli.format {
                OutputFormat::Json => {
                    let body = serde_json::json!({
                        "summary": summary,
                        "loads": rolling_load(&entries),
                        "trends": trends,
                        "insight": insight,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Table => {
                    println!("Hello, {}", settings.name);
                    println!();
                    println!("Today's log:   {}", summary.status);
                    println!("Sober streak:  {} entries", summary.sober_streak);
                    match &summary.top_load {
                        Some(load) => println!(
                            "Primary load:  {} {}{} per entry",
                            load.label,
                            load.display_average(),
                            load.unit
                        ),
                        None => println!("Primary load:  0"),
                    }
                    println!("Entries:       {}", summary.total_entries);
                    println!();
                    print_trends(&trends);
                    println!();
                    println!("Insight:");
                    println!("  {}", insight);
                }
            }
        }

        Commands::Trends => {
            let trends = substance_trends(&repo.list()?);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trends)?),
                OutputFormat::Table => print_trends(&trends),
            }
        }

        Commands::Export { output } => {
            let entries = repo.list()?;
            match output {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(export_filename("soberstats", today))
                    } else {
                        path
                    };
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("cannot create {:?}", path))?;
                    write_csv(&entries, file)?;
                    println!("Exported {} entries to {:?}", entries.len(), path);
                }
                None => write_csv(&entries, std::io::stdout().lock())?,
            }
        }

        Commands::Settings {
            name,
            theme,
            family_mode,
            password,
            remove_password,
        } => {
            let mut updated = settings.clone();
            if let Some(name) = name {
                updated = updated.with_name(name);
            }
            if let Some(theme) = theme {
                updated = updated.with_theme(theme);
            }
            if let Some(switch) = family_mode {
                updated = updated.with_family_mode(switch == Switch::On);
            }
            if let Some(password) = &password {
                updated = updated.with_password(password);
            }
            if remove_password {
                updated = updated.without_password();
            }

            if updated != settings {
                repo.save_settings(&updated)?;
                tracing::info!("Settings updated");
            }
            print_settings(&updated, cli.format)?;
        }

        Commands::Seed => {
            let written = repo.seed_demo_data(today)?;
            if written == 0 {
                println!("Journal already has entries; nothing seeded");
            } else {
                println!("Seeded {} days of demo data", written);
            }
        }

        Commands::Clear { yes } => {
            if !yes {
                bail!("Refusing to delete all data without --yes");
            }
            repo.clear()?;
            println!("All entries and settings deleted");
        }

        Commands::Catalog => match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(CATALOG)?),
            OutputFormat::Table => {
                println!("{:<12} {:<26} {:<10} {:<8} {}", "ID", "Name", "Half-life", "Equiv", "Unit");
                println!("{}", "-".repeat(64));
                for substance in CATALOG {
                    println!(
                        "{:<12} {:<26} {:<10} {:<8} {}",
                        substance.id,
                        substance.display_name,
                        substance.half_life_hours,
                        substance.potency_equivalence,
                        substance.unit
                    );
                }
            }
        },

        // Written above, before storage is opened
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Remote model when a key is configured, otherwise the offline rules
fn insight_generator(config: &Config) -> anyhow::Result<Arc<dyn InsightGenerator>> {
    if config.insight.enabled && config.insight.has_api_key() {
        let client = RemoteInsightClient::new(config.insight.remote())?;
        Ok(Arc::new(client))
    } else {
        tracing::debug!("No insight API key, using rule-based insight");
        Ok(Arc::new(RuleBasedInsight::new()))
    }
}

fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    match s.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .with_context(|| format!("Invalid date: {}. Use today, yesterday or YYYY-MM-DD", s)),
    }
}

/// Fields given to `log`; absent fields leave the entry unchanged
struct LogEdit {
    alcohol: Option<f64>,
    sober: bool,
    doses: Vec<TakenMedicationEntry>,
    mood: Option<u8>,
    notes: Option<String>,
}

impl LogEdit {
    fn apply(self, mut entry: DailyLogEntry) -> DailyLogEntry {
        if let Some(units) = self.alcohol {
            entry = entry.alcohol(true, units);
        } else if self.sober {
            entry = entry.alcohol(false, 0.0);
        }
        if !self.doses.is_empty() {
            entry.medications = self.doses;
        }
        if let Some(mood) = self.mood {
            entry = entry.mood(mood);
        }
        if let Some(notes) = &self.notes {
            entry = entry.notes(notes);
        }
        entry
    }
}

/// A finite, non-negative quantity
fn parse_amount(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {}", s))?;
    if is_valid_quantity(value) {
        Ok(value)
    } else {
        Err(format!("must be a finite number of at least 0: {}", s))
    }
}

fn parse_dose(s: &str) -> anyhow::Result<TakenMedicationEntry> {
    let Some((substance, amount)) = s.split_once('=') else {
        bail!("Invalid dose: {}. Use ID=AMOUNT, e.g. diazepam=10", s);
    };
    let amount = parse_amount(amount)
        .map_err(|e| anyhow::anyhow!("Invalid dose amount in {}: {}", s, e))?;

    let substance = substance.trim();
    match substance.split_once(':') {
        Some((OTHER_SUBSTANCE_ID, name)) => Ok(TakenMedicationEntry::other(name, amount)),
        _ => Ok(TakenMedicationEntry::new(substance, amount)),
    }
}

fn print_entries(entries: &[DailyLogEntry]) {
    if entries.is_empty() {
        println!("No entries yet.");
        println!();
        println!("Record today with:");
        println!("  soberstats log --dose diazepam=10 --mood 6");
        return;
    }

    println!("{:<12} {:<8} {:<5} {:<36} {}", "Date", "Alcohol", "Mood", "Doses", "ID");
    println!("{}", "-".repeat(100));

    for entry in entries {
        let alcohol = if entry.alcohol_consumed {
            format!("{}u", entry.alcohol_units)
        } else {
            "-".to_string()
        };
        let mood = entry.mood.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string());
        let doses = entry
            .medications
            .iter()
            .map(|m| {
                format!(
                    "{} {}{}",
                    m.custom_name.clone().unwrap_or_else(|| soberstats::catalog::label_for(&m.substance_id)),
                    m.amount,
                    soberstats::catalog::unit_for(&m.substance_id)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        println!("{:<12} {:<8} {:<5} {:<36} {}", entry.date, alcohol, mood, doses, entry.id);
    }
}

fn print_trends(trends: &[soberstats::analytics::SubstanceTrend]) {
    if trends.is_empty() {
        println!("No substance trends yet.");
        return;
    }

    println!("{:<14} {:>10} {:>10} {:>6}", "Substance", "This week", "Last week", "Trend");
    println!("{}", "-".repeat(44));
    for trend in trends {
        let (current, previous) = trend.display_averages();
        println!(
            "{:<14} {:>10} {:>10} {:>6}",
            trend.label, current, previous, trend.direction
        );
    }
}

fn print_settings(settings: &UserSettings, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "name": settings.name,
                "theme": settings.theme,
                "familyMode": settings.family_mode,
                "locked": settings.is_locked(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table => {
            println!("Name:         {}", settings.name);
            println!("Theme:        {}", settings.theme.as_deref().unwrap_or("default"));
            println!("Family mode:  {}", if settings.family_mode { "on" } else { "off" });
            println!("Lock:         {}", if settings.is_locked() { "set" } else { "none" });
        }
    }
    Ok(())
}
