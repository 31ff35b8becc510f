//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::insight::RemoteInsightConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub insight: InsightConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the log collection and settings are kept
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("soberstats").to_string_lossy().to_string())
        .unwrap_or_else(|| "./soberstats_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Narrative insight configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InsightConfig {
    #[serde(default = "default_insight_enabled")]
    pub enabled: bool,

    #[serde(default = "default_insight_url")]
    pub base_url: String,

    #[serde(default = "default_insight_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_insight_timeout")]
    pub request_timeout_ms: u64,
}

fn default_insight_enabled() -> bool {
    true
}

fn default_insight_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_insight_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_insight_timeout() -> u64 {
    15_000
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            enabled: default_insight_enabled(),
            base_url: default_insight_url(),
            model: default_insight_model(),
            api_key: None,
            request_timeout_ms: default_insight_timeout(),
        }
    }
}

impl InsightConfig {
    /// Whether a remote request can be attempted at all
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Settings for [`crate::insight::RemoteInsightClient`]
    pub fn remote(&self) -> RemoteInsightConfig {
        RemoteInsightConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("soberstats").join("config.toml")),
            Some(PathBuf::from("/etc/soberstats/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = var("SOBERSTATS_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(url) = var("SOBERSTATS_INSIGHT_URL") {
            self.insight.base_url = url;
        }
        if let Some(model) = var("SOBERSTATS_INSIGHT_MODEL") {
            self.insight.model = model;
        }
        if let Some(key) = var("SOBERSTATS_API_KEY").or_else(|| var("API_KEY")) {
            self.insight.api_key = Some(key);
        }

        if let Some(level) = var("SOBERSTATS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SOBERSTATS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# SoberStats Configuration
#
# Environment variables override these settings:
# - SOBERSTATS_DATA_DIR
# - SOBERSTATS_INSIGHT_URL
# - SOBERSTATS_INSIGHT_MODEL
# - SOBERSTATS_API_KEY (or API_KEY)
# - SOBERSTATS_LOG_LEVEL
# - SOBERSTATS_LOG_FORMAT

[storage]
# Directory holding soberstats_logs.json and soberstats_settings.json
data_dir = "~/.local/share/soberstats"

[insight]
# Ask a hosted model for a narrative summary on the dashboard.
# Without an API key the built-in rule-based summary is used.
enabled = true

# Generation API base URL and model
base_url = "https://generativelanguage.googleapis.com"
model = "gemini-2.5-flash"

# API key (prefer the environment variable)
# api_key = ""

# Request timeout in milliseconds
request_timeout_ms = 15000

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
