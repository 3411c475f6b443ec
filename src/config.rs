use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{
    builtin_locations, merge_locations, StorageLocation, DEFAULT_HOST, DEFAULT_LOCATION,
    DEFAULT_PORT,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub default_location: String,
    /// Read the login banner after connecting and show the quota row.
    pub fetch_quota: bool,
    pub banner_wait_ms: u64,
    pub connect_timeout_secs: u64,
    pub log_dir: PathBuf,
    /// Added to, or replacing, the built-in storage locations.
    pub locations: Vec<StorageLocation>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            default_location: DEFAULT_LOCATION.to_string(),
            fetch_quota: true,
            banner_wait_ms: 3000,
            connect_timeout_secs: 20,
            log_dir: PathBuf::from("logs"),
            locations: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Built-in locations merged with the configured ones.
    pub fn all_locations(&self) -> Vec<StorageLocation> {
        merge_locations(builtin_locations(), self.locations.clone())
    }

    pub fn banner_wait(&self) -> Duration {
        Duration::from_millis(self.banner_wait_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Command line values win over the file.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(host) = &overrides.host {
            self.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(location) = &overrides.location {
            self.default_location = location.clone();
        }
        if overrides.no_quota {
            self.fetch_quota = false;
        }
    }
}

/// Settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub location: Option<String>,
    pub no_quota: bool,
}

#[derive(Debug)]
pub struct ConfigManager {
    config_file: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("metabrowse");

        Ok(Self {
            config_file: config_dir.join("metabrowse.toml"),
        })
    }

    pub fn with_path(config_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_file
    }

    /// Load the config file. A missing file means built-in defaults.
    pub fn load_config(&self) -> Result<AppConfig> {
        if !self.config_file.exists() {
            tracing::debug!(
                "No config at {}, using defaults",
                self.config_file.display()
            );
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).with_context(|| {
            format!("Failed to read config file {}", self.config_file.display())
        })?;

        let config: AppConfig = toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file {}", self.config_file.display())
        })?;

        Ok(config)
    }
}
