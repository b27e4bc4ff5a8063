//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use steward_pipeline::EvalConfig;

fn default_user_agent() -> String {
    EvalConfig::default().user_agent
}

fn default_commons_endpoint() -> String {
    EvalConfig::default().commons_endpoint
}

fn default_wikidata_endpoint() -> String {
    EvalConfig::default().wikidata_endpoint
}

fn default_region_endpoint() -> String {
    EvalConfig::default().region_endpoint
}

fn default_batch_delay() -> u64 {
    EvalConfig::default().batch_delay_secs
}

/// CLI configuration, stored at `~/.steward/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Media commons endpoint
    #[serde(default = "default_commons_endpoint")]
    pub commons_endpoint: String,

    /// Knowledge-base endpoint
    #[serde(default = "default_wikidata_endpoint")]
    pub wikidata_endpoint: String,

    /// Region lookup service endpoint
    #[serde(default = "default_region_endpoint")]
    pub region_endpoint: String,

    /// Pause between batch requests (seconds)
    #[serde(default = "default_batch_delay")]
    pub batch_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            commons_endpoint: default_commons_endpoint(),
            wikidata_endpoint: default_wikidata_endpoint(),
            region_endpoint: default_region_endpoint(),
            batch_delay_secs: default_batch_delay(),
        }
    }
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".steward").join("config.toml"))
    }

    /// Load configuration from the default path, or fall back to defaults.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Build an evaluation configuration from this config plus CLI args.
    pub fn eval_config(&self, lang: &str, rounds: usize, delay_secs: Option<u64>) -> EvalConfig {
        EvalConfig {
            lang: lang.to_string(),
            rounds,
            commons_endpoint: self.commons_endpoint.clone(),
            wikidata_endpoint: self.wikidata_endpoint.clone(),
            region_endpoint: self.region_endpoint.clone(),
            user_agent: self.user_agent.clone(),
            batch_delay_secs: delay_secs.unwrap_or(self.batch_delay_secs),
        }
    }
}
