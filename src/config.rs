//! Configuration management for Enode Bridge
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files with support for environment variable overrides.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

mod defaults;

fn default_language() -> String {
    "en-US".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Web server binding configuration
    pub web: WebConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Vehicle polling interval in seconds
    pub poll_interval_secs: u64,

    /// Directory holding per-entry state files
    pub storage_dir: String,

    /// Configured Enode integration instances
    pub entries: Vec<EntryConfig>,
}

/// One Enode client/instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Stable identifier used in webhook URLs and API paths
    pub id: String,

    /// OAuth2 client id
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// Use the Enode sandbox environment
    #[serde(default)]
    pub sandbox: bool,

    /// Restrict polling and linking to one Enode user
    #[serde(default)]
    pub user_id: Option<String>,

    /// Language used for the link UI
    #[serde(default = "default_language")]
    pub language: String,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Bind address
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Public HTTPS base URL that Enode can reach (required for webhooks and linking)
    #[serde(default)]
    pub external_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional console-specific level
    #[serde(default)]
    pub console_level: Option<String>,

    /// Optional file-specific level
    #[serde(default)]
    pub file_level: Option<String>,

    /// Path to log file or log directory
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first existing default location
    pub fn load() -> Result<Self> {
        let default_paths = [
            "enode_bridge.yaml",
            "/data/enode_bridge.yaml",
            "/etc/enode-bridge/config.yaml",
        ];

        let mut config = default_paths
            .iter()
            .find(|p| Path::new(p).exists())
            .map(Self::from_file)
            .transpose()?
            .unwrap_or_default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Apply `ENODE_CLIENT_ID` / `ENODE_CLIENT_SECRET` to a single-entry config
    pub fn apply_env_overrides(&mut self) {
        if self.entries.len() != 1 {
            return;
        }
        let entry = &mut self.entries[0];
        if let Ok(v) = std::env::var("ENODE_CLIENT_ID")
            && !v.is_empty()
        {
            entry.client_id = v;
        }
        if let Ok(v) = std::env::var("ENODE_CLIENT_SECRET")
            && !v.is_empty()
        {
            entry.client_secret = v;
        }
    }

    /// Find an entry by id
    pub fn entry(&self, id: &str) -> Option<&EntryConfig> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.web.host.is_empty() {
            return Err(BridgeError::validation(
                "web.host",
                "Host cannot be empty",
            ));
        }

        if self.web.port == 0 {
            return Err(BridgeError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        if let Some(url) = &self.web.external_url
            && !(url.starts_with("https://") || url.starts_with("http://"))
        {
            return Err(BridgeError::validation(
                "web.external_url",
                "Must be an absolute http(s) URL",
            ));
        }

        if self.poll_interval_secs == 0 {
            return Err(BridgeError::validation(
                "poll_interval_secs",
                "Must be greater than 0",
            ));
        }

        crate::logging::parse_log_level(&self.logging.level)?;

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.id.trim().is_empty() {
                return Err(BridgeError::validation("entries.id", "Cannot be empty"));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(BridgeError::validation(
                    "entries.id".to_string(),
                    format!("Duplicate entry id '{}'", entry.id),
                ));
            }
            if entry.client_id.trim().is_empty() {
                return Err(BridgeError::validation(
                    "entries.client_id".to_string(),
                    format!("Missing client id for entry '{}'", entry.id),
                ));
            }
        }

        Ok(())
    }
}
