//! Configuration management for NewsPulse services.
//!
//! All NewsPulse services share a unified configuration file at
//! `~/.newspulse/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Explicit config file values
//! 2. Environment variables
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `NEWS_API_KEY` → news.api_key
//! - `NEWSPULSE_NEWS_BASE_URL` → news.base_url
//! - `NEWSPULSE_REFRESH_MINUTES` → news.refresh_minutes
//! - `NEWSPULSE_LOG_LEVEL` → observability.log_level
//! - `NEWSPULSE_LOG_FORMAT` → observability.log_format

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".newspulse"),
        |dirs| dirs.home_dir().join(".newspulse"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// News Configuration
// ============================================================================

/// News provider and ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// NewsAPI.org API key. Required for live ingestion.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Override for the NewsAPI base URL (used by tests and proxies).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Minutes between refresh cycles.
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,

    /// Articles fetched per category per refresh.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Categories to ingest. `None` means all NewsAPI categories.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            refresh_minutes: default_refresh_minutes(),
            page_size: default_page_size(),
            categories: None,
        }
    }
}

fn default_refresh_minutes() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging and observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration for NewsPulse services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// News provider and ingestion settings
    #[serde(default)]
    pub news: NewsConfig,

    /// Logging settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable fallbacks.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            if !key.is_empty() {
                self.news.api_key = Some(key);
            }
        }

        if let Ok(url) = std::env::var("NEWSPULSE_NEWS_BASE_URL") {
            if !url.is_empty() {
                self.news.base_url = Some(url);
            }
        }

        if let Ok(minutes) = std::env::var("NEWSPULSE_REFRESH_MINUTES") {
            if let Ok(m) = minutes.parse() {
                self.news.refresh_minutes = m;
            }
        }

        if let Ok(level) = std::env::var("NEWSPULSE_LOG_LEVEL") {
            if !level.is_empty() {
                self.observability.log_level = level;
            }
        }

        if let Ok(format) = std::env::var("NEWSPULSE_LOG_FORMAT") {
            if !format.is_empty() {
                self.observability.log_format = format;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.news.api_key.is_none());
        assert_eq!(config.news.refresh_minutes, 30);
        assert_eq!(config.news.page_size, 10);
        assert!(config.news.categories.is_none());
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.log_format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "news": {{ "api_key": "k-123", "refresh_minutes": 5 }},
                "observability": {{ "log_level": "debug" }}
            }}"#
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.news.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.news.refresh_minutes, 5);
        // Unset fields fall back to serde defaults
        assert_eq!(config.news.page_size, 10);
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, "pretty");
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_partial_json_round_trip() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.news.refresh_minutes, 30);

        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.news.page_size, config.news.page_size);
    }
}
